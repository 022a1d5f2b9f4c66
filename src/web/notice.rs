//! `TableNotice` as a blocking browser alert, the way the table has always
//! reported rejected actions.

use crate::session::TableNotice;

pub struct AlertNotice;

impl TableNotice for AlertNotice {
    fn table_error(&self, message: &str) {
        gloo::dialogs::alert(message);
    }
}
