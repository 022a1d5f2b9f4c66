//! Fixed catalog of motivational messages shown after a losing streak.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Motivation {
    pub title: &'static str,
    pub message: &'static str,
    pub icon: &'static str,
}

const fn entry(title: &'static str, message: &'static str, icon: &'static str) -> Motivation {
    Motivation {
        title,
        message,
        icon,
    }
}

pub static MOTIVATIONS: [Motivation; 15] = [
    entry(
        "¡La suerte está por cambiar!",
        "Las rachas negras no duran para siempre. Tu momento de victoria está cerca.",
        "\u{26A1}",
    ),
    entry(
        "¡Eres más fuerte que la mala racha!",
        "Cada pérdida te hace más sabio. La próxima jugada será diferente.",
        "\u{1F4AA}",
    ),
    entry(
        "¡Mantén la calma!",
        "Los mejores jugadores saben que la paciencia es la clave del éxito.",
        "\u{1F9E0}",
    ),
    entry(
        "¡No te rindas!",
        "Detrás de cada gran ganador hay una historia de perseverancia.",
        "\u{1F3C6}",
    ),
    entry(
        "¡Aprendizaje en acción!",
        "Cada intento te acerca más a dominar el juego. Sigue adelante.",
        "\u{1F4DA}",
    ),
    entry(
        "¡La marea cambiará!",
        "Así como el mar tiene sus mareas, la suerte tiene sus ciclos.",
        "\u{1F30A}",
    ),
    entry(
        "¡Fuerza mental!",
        "El verdadero juego está en mantener la concentración. Tú puedes.",
        "\u{1F3AF}",
    ),
    entry(
        "¡Estrategia en progreso!",
        "Estás refinando tu técnica. La victoria será más dulce.",
        "\u{265F}\u{FE0F}",
    ),
    entry(
        "¡Resiliencia!",
        "Lo que no te derrota, te hace más fuerte. Sigue jugando.",
        "\u{1F6E1}\u{FE0F}",
    ),
    entry(
        "¡Energía positiva!",
        "Visualiza la victoria. Tu actitud atrae la buena suerte.",
        "\u{2728}",
    ),
    entry(
        "¡Experiencia valiosa!",
        "Cada partida te da información valiosa para las siguientes.",
        "\u{1F48E}",
    ),
    entry(
        "¡Momento de reflexión!",
        "Tómate un respiro y vuelve con nueva energía. Lo tienes.",
        "\u{1F305}",
    ),
    entry(
        "¡Jugador inteligente!",
        "Sabes que los altibajos son parte del juego. Sigue tu instinto.",
        "\u{1F3AE}",
    ),
    entry(
        "¡Futuro ganador!",
        "Las estadísticas están a tu favor. La ley de los promedios funciona.",
        "\u{1F4C8}",
    ),
    entry(
        "¡Actitud ganadora!",
        "Tu perseverancia hoy será recompensada mañana. Continúa.",
        "\u{2B50}",
    ),
];

/// Entry at `index`, wrapping so any picker output is usable.
pub fn pick(index: usize) -> &'static Motivation {
    &MOTIVATIONS[index % MOTIVATIONS.len()]
}
