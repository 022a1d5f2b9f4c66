//! Table session — one player's view of a live blackjack room.
//!
//! Joins the room on creation and again on every reconnect, keeps the header
//! balance in step with the server's `estado_blackjack` and `balance_update`
//! pushes, surfaces rejected actions, and sends the player's table actions.

use std::collections::HashMap;
use std::rc::{Rc, Weak};

use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::Error;
use crate::events::{BALANCE_UPDATE, CONNECTED, Channel, Subscription, TABLE_ERROR, TABLE_STATE};

/// Where the balance is shown.
pub trait BalanceDisplay {
    /// `text` is the formatted amount, `raw` the number kept alongside it.
    fn set_balance(&self, text: &str, raw: f64);
}

/// Where server-side rejections of table actions are surfaced.
pub trait TableNotice {
    fn table_error(&self, message: &str);
}

/// Two decimals, the way the header has always shown it.
pub fn format_balance(balance: f64) -> String {
    format!("{:.2}", balance)
}

// ── Payloads ───────────────────────────────────────────────────────

/// Amounts arrive as numbers but older handlers send numeric strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Amount {
    Number(f64),
    Text(String),
}

impl Amount {
    fn value(&self) -> Option<f64> {
        let value: Option<f64> = match self {
            Amount::Number(n) => Some(*n),
            Amount::Text(s) => s.trim().parse().ok(),
        };
        value.filter(|n| n.is_finite())
    }
}

/// Player ids are strings in table state but numbers elsewhere.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum PlayerId {
    Number(u64),
    Text(String),
}

impl PlayerId {
    fn matches(&self, me: &str) -> bool {
        match self {
            PlayerId::Number(n) => n.to_string() == me,
            PlayerId::Text(s) => s == me,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Seat {
    #[serde(default)]
    balance: Option<Amount>,
}

#[derive(Debug, Deserialize)]
struct TableState {
    #[serde(default, rename = "jugadores")]
    players: HashMap<String, Seat>,
}

#[derive(Debug, Deserialize)]
struct BalanceUpdate {
    #[serde(default)]
    balance: Option<Amount>,
    #[serde(default)]
    user_id: Option<PlayerId>,
}

#[derive(Debug, Deserialize)]
struct TableError {
    #[serde(default)]
    msg: Option<String>,
}

/// Balance for `me` in an `estado_blackjack` payload.
pub fn balance_from_state(payload: &Value, me: &str) -> Result<Option<f64>, Error> {
    let state = TableState::deserialize(payload)?;
    Ok(state
        .players
        .get(me)
        .and_then(|seat| seat.balance.as_ref())
        .and_then(Amount::value))
}

/// Balance in a `balance_update` payload, unless it is addressed to someone
/// else. Without an identity only unaddressed payloads are taken.
pub fn balance_from_update(payload: &Value, me: Option<&str>) -> Result<Option<f64>, Error> {
    let update = BalanceUpdate::deserialize(payload)?;
    let mine = match (&update.user_id, me) {
        (None, _) => true,
        (Some(user), Some(me)) => user.matches(me),
        (Some(_), None) => false,
    };
    if !mine {
        return Ok(None);
    }
    Ok(update.balance.as_ref().and_then(Amount::value))
}

// ── Intents ────────────────────────────────────────────────────────

/// A player action sent to the table. No acknowledgement is expected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    PlaceBet(f64),
    StartRound,
    TakeCard,
    Hold,
    VoteRematch,
}

impl Intent {
    pub fn event(&self) -> &'static str {
        match self {
            Intent::PlaceBet(_) => "apostar_blackjack",
            Intent::StartRound => "iniciar_ronda_blackjack",
            Intent::TakeCard => "hit_blackjack",
            Intent::Hold => "stand_blackjack",
            Intent::VoteRematch => "voto_revancha",
        }
    }

    fn payload(&self, room_id: u64) -> Result<Value, Error> {
        match *self {
            Intent::PlaceBet(amount) if !amount.is_finite() || amount <= 0.0 => {
                Err(Error::InvalidBet(amount))
            }
            Intent::PlaceBet(amount) => Ok(json!({ "sala_id": room_id, "cantidad": amount })),
            _ => Ok(json!({ "sala_id": room_id })),
        }
    }
}

pub const JOIN_ROOM: &str = "join_sala_blackjack";

// ── Session ────────────────────────────────────────────────────────

pub struct TableSession {
    room_id: u64,
    channel: Rc<dyn Channel>,
    _subscriptions: Vec<Subscription>,
}

impl TableSession {
    /// Join `room_id` and start mirroring the balance into `display`.
    /// Table state is only read with an identity (`me`); plain balance
    /// updates are mirrored either way. The room is re-joined on every
    /// reconnect.
    pub fn join(
        channel: Rc<dyn Channel>,
        room_id: u64,
        me: Option<String>,
        display: Rc<dyn BalanceDisplay>,
        notice: Rc<dyn TableNotice>,
    ) -> Self {
        let mut subscriptions = Vec::with_capacity(4);

        match &me {
            Some(me) => {
                let (state_me, state_display) = (me.clone(), display.clone());
                subscriptions.push(channel.subscribe(
                    TABLE_STATE,
                    Box::new(move |payload: Value| {
                        show(&*state_display, balance_from_state(&payload, &state_me), TABLE_STATE);
                    }),
                ));
            }
            None => log::warn!("No player id configured; table state balances ignored"),
        }

        subscriptions.push(channel.subscribe(
            BALANCE_UPDATE,
            Box::new(move |payload: Value| {
                show(&*display, balance_from_update(&payload, me.as_deref()), BALANCE_UPDATE);
            }),
        ));

        subscriptions.push(channel.subscribe(
            TABLE_ERROR,
            Box::new(move |payload: Value| {
                let message = TableError::deserialize(&payload)
                    .ok()
                    .and_then(|e| e.msg)
                    .unwrap_or_else(|| "Error".to_string());
                log::warn!("Table rejected action: {}", message);
                notice.table_error(&message);
            }),
        ));

        let rejoin: Weak<dyn Channel> = Rc::downgrade(&channel);
        subscriptions.push(channel.subscribe(
            CONNECTED,
            Box::new(move |_: Value| {
                if let Some(channel) = rejoin.upgrade() {
                    log::info!("Reconnected; rejoining blackjack room {}", room_id);
                    channel.emit(JOIN_ROOM, json!({ "sala_id": room_id }));
                }
            }),
        ));

        channel.emit(JOIN_ROOM, json!({ "sala_id": room_id }));
        log::info!("Joined blackjack room {}", room_id);

        Self {
            room_id,
            channel,
            _subscriptions: subscriptions,
        }
    }

    pub fn room_id(&self) -> u64 {
        self.room_id
    }

    pub fn send(&self, intent: Intent) -> Result<(), Error> {
        let payload = intent.payload(self.room_id)?;
        self.channel.emit(intent.event(), payload);
        Ok(())
    }
}

fn show(display: &dyn BalanceDisplay, balance: Result<Option<f64>, Error>, event: &str) {
    match balance {
        Ok(Some(balance)) => display.set_balance(&format_balance(balance), balance),
        Ok(None) => {}
        Err(err) => log::warn!("Ignoring {} payload: {}", event, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryChannel;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Header {
        shown: RefCell<Vec<(String, f64)>>,
        errors: RefCell<Vec<String>>,
    }

    impl BalanceDisplay for Header {
        fn set_balance(&self, text: &str, raw: f64) {
            self.shown.borrow_mut().push((text.to_string(), raw));
        }
    }

    impl TableNotice for Header {
        fn table_error(&self, message: &str) {
            self.errors.borrow_mut().push(message.to_string());
        }
    }

    fn session(me: Option<&str>) -> (TableSession, Rc<MemoryChannel>, Rc<Header>) {
        let channel = Rc::new(MemoryChannel::default());
        let header = Rc::new(Header::default());
        let session = TableSession::join(
            channel.clone(),
            42,
            me.map(str::to_string),
            header.clone(),
            header.clone(),
        );
        (session, channel, header)
    }

    #[test]
    fn balance_update_formats_two_decimals() {
        let (_s, channel, header) = session(Some("7"));
        channel.deliver(BALANCE_UPDATE, json!({ "balance": 123.4 }));
        assert_eq!(*header.shown.borrow(), vec![("123.40".to_string(), 123.4)]);
    }

    #[test]
    fn balance_update_for_someone_else_is_ignored() {
        let (_s, channel, header) = session(Some("7"));
        channel.deliver(BALANCE_UPDATE, json!({ "balance": 50, "user_id": 8 }));
        channel.deliver(BALANCE_UPDATE, json!({ "balance": 60, "user_id": 7 }));
        assert_eq!(*header.shown.borrow(), vec![("60.00".to_string(), 60.0)]);
    }

    #[test]
    fn table_state_picks_my_seat() {
        let (_s, channel, header) = session(Some("7"));
        channel.deliver(
            TABLE_STATE,
            json!({
                "jugadores": {
                    "7": { "username": "ana", "balance": 990.5, "apuesta": 10 },
                    "8": { "username": "luis", "balance": 15 }
                },
                "dealer": []
            }),
        );
        assert_eq!(*header.shown.borrow(), vec![("990.50".to_string(), 990.5)]);
    }

    #[test]
    fn table_state_without_my_seat_changes_nothing() {
        let (_s, channel, header) = session(Some("7"));
        channel.deliver(TABLE_STATE, json!({ "jugadores": { "8": { "balance": 15 } } }));
        channel.deliver(TABLE_STATE, json!({}));
        assert!(header.shown.borrow().is_empty());
    }

    #[test]
    fn numeric_string_balances_are_accepted() {
        assert_eq!(
            balance_from_update(&json!({ "balance": "12.5" }), Some("1")).unwrap(),
            Some(12.5)
        );
        assert_eq!(balance_from_update(&json!({ "balance": "lots" }), Some("1")).unwrap(), None);
    }

    #[test]
    fn malformed_payload_is_an_error() {
        assert!(balance_from_state(&json!({ "jugadores": 3 }), "1").is_err());
    }

    #[test]
    fn no_identity_still_mirrors_unaddressed_updates() {
        let (_s, channel, header) = session(None);
        assert_eq!(channel.subscriber_count(TABLE_STATE), 0);
        channel.deliver(BALANCE_UPDATE, json!({ "balance": 123.4 }));
        channel.deliver(BALANCE_UPDATE, json!({ "balance": 50, "user_id": 8 }));
        assert_eq!(*header.shown.borrow(), vec![("123.40".to_string(), 123.4)]);
    }

    #[test]
    fn reconnect_rejoins_the_room() {
        let (_s, channel, _) = session(Some("7"));
        channel.deliver(CONNECTED, Value::Null);
        let joins = channel
            .emitted()
            .into_iter()
            .filter(|(event, payload)| event == JOIN_ROOM && *payload == json!({ "sala_id": 42 }))
            .count();
        assert_eq!(joins, 2);
    }

    #[test]
    fn table_errors_reach_the_notice() {
        let (_s, channel, header) = session(Some("7"));
        channel.deliver(TABLE_ERROR, json!({ "msg": "Saldo insuficiente" }));
        channel.deliver(TABLE_ERROR, json!({}));
        assert_eq!(
            *header.errors.borrow(),
            vec!["Saldo insuficiente".to_string(), "Error".to_string()]
        );
    }

    #[test]
    fn joining_emits_join_event() {
        let (_s, channel, _) = session(Some("7"));
        assert_eq!(
            channel.emitted(),
            vec![(JOIN_ROOM.to_string(), json!({ "sala_id": 42 }))]
        );
    }

    #[test]
    fn intents_carry_room_id() {
        let (s, channel, _) = session(Some("7"));
        s.send(Intent::PlaceBet(25.0)).unwrap();
        s.send(Intent::StartRound).unwrap();
        s.send(Intent::TakeCard).unwrap();
        s.send(Intent::Hold).unwrap();
        s.send(Intent::VoteRematch).unwrap();
        let emitted = channel.emitted();
        assert_eq!(
            emitted[1],
            ("apostar_blackjack".to_string(), json!({ "sala_id": 42, "cantidad": 25.0 }))
        );
        let names: Vec<&str> = emitted[2..].iter().map(|(e, _)| e.as_str()).collect();
        assert_eq!(
            names,
            vec!["iniciar_ronda_blackjack", "hit_blackjack", "stand_blackjack", "voto_revancha"]
        );
    }

    #[test]
    fn bad_bets_are_rejected_and_not_sent() {
        let (s, channel, _) = session(Some("7"));
        assert_eq!(s.send(Intent::PlaceBet(0.0)), Err(Error::InvalidBet(0.0)));
        assert!(s.send(Intent::PlaceBet(f64::NAN)).is_err());
        assert_eq!(channel.emitted().len(), 1);
    }

    #[test]
    fn format_balance_rounds() {
        assert_eq!(format_balance(0.0), "0.00");
        assert_eq!(format_balance(1234.567), "1234.57");
    }
}
