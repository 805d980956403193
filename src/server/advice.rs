//! Templated Spanish commentary for the fullpro reading.
//!
//! The triggers (aspect type, phase bucket, house number) are the contract;
//! the prose is editorial copy.

use crate::models::{AspectEvent, LunarPhaseName};

/// One-line reading of the headline aspect, keyed on the aspect type.
pub fn vibe_hint(event: &AspectEvent) -> Option<String> {
    let tp = &event.tp;
    let natal = &event.natal;
    let hint = match event.aspect.as_str() {
        "Cuadratura" => format!(
            "{tp} en cuadratura a {natal}: tensión útil. Pausa antes de reaccionar."
        ),
        "Oposición" => format!(
            "{tp} en oposición a {natal}: espejo. Escucha lo que el otro activa en ti."
        ),
        "Conjunción" => format!(
            "{tp} en conjunción a {natal}: foco alto. Canaliza en una sola cosa."
        ),
        "Trígono" => format!(
            "{tp} en trígono a {natal}: fluye. Avanza algo que venías postergando."
        ),
        "Sextil" => format!(
            "{tp} en sextil a {natal}: oportunidad pequeña. Si actúas, se abre."
        ),
        _ => return None,
    };
    Some(hint)
}

/// Money advisory, keyed first on the headline's house, then on the phase.
pub fn money_whisper(phase: LunarPhaseName, headline_house: Option<u8>) -> String {
    match headline_house {
        Some(2) => "La Casa 2 está activa: revisa precios y cobra lo pendiente.".to_string(),
        Some(6) => "La Casa 6 está activa: un ajuste en la rutina protege tu bolsillo.".to_string(),
        Some(8) => "La Casa 8 está activa: ordena deudas y recursos compartidos.".to_string(),
        Some(10) => "La Casa 10 está activa: una gestión laboral puede traer ingreso.".to_string(),
        _ => match phase {
            LunarPhaseName::NewMoon => {
                "Luna nueva: siembra una intención de dinero, no la gastes.".to_string()
            }
            LunarPhaseName::FullMoon => {
                "Luna llena: cierra una venta o suelta lo que no rinde.".to_string()
            }
            p if p.is_waxing() => {
                "Fase creciente: buen momento para pedir, no para prestar.".to_string()
            }
            _ => "Fase menguante: recorta un gasto pequeño hoy.".to_string(),
        },
    }
}

/// Compose the headline line shown at the top of the reading.
pub fn top_line(
    moon_sign: &str,
    sun_sign: &str,
    moon_house: Option<u8>,
    sun_house: Option<u8>,
    headline: Option<&AspectEvent>,
) -> String {
    let mut bits = vec![format!("Luna en {moon_sign}"), format!("Sol en {sun_sign}")];
    if let Some(h) = moon_house {
        bits.push(format!("Luna por Casa {h}"));
    }
    if let Some(h) = sun_house {
        bits.push(format!("Sol por Casa {h}"));
    }
    if let Some(e) = headline {
        bits.push(format!(
            "{} {} {} (orb {}°)",
            e.tp,
            e.aspect.to_lowercase(),
            e.natal,
            e.orb
        ));
    }
    bits.join(" • ")
}
