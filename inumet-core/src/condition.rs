use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt};

/// Sky/weather state published as a numeric code in forecast items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Clear,
    MostlyClear,
    PartlyCloudy,
    MostlyCloudy,
    Overcast,
    Mist,
    Fog,
    Drizzle,
    LightRain,
    Rain,
    HeavyRain,
    Showers,
    IsolatedThunderstorms,
    Thunderstorms,
    SevereThunderstorms,
    Hail,
    Snow,
    Frost,
    StrongWind,
    Windy,
    Haze,
}

impl Condition {
    /// Map a raw weather code to its condition. Codes outside `1..=21` have none.
    pub const fn from_code(code: i64) -> Option<Self> {
        let condition = match code {
            1 => Condition::Clear,
            2 => Condition::MostlyClear,
            3 => Condition::PartlyCloudy,
            4 => Condition::MostlyCloudy,
            5 => Condition::Overcast,
            6 => Condition::Mist,
            7 => Condition::Fog,
            8 => Condition::Drizzle,
            9 => Condition::LightRain,
            10 => Condition::Rain,
            11 => Condition::HeavyRain,
            12 => Condition::Showers,
            13 => Condition::IsolatedThunderstorms,
            14 => Condition::Thunderstorms,
            15 => Condition::SevereThunderstorms,
            16 => Condition::Hail,
            17 => Condition::Snow,
            18 => Condition::Frost,
            19 => Condition::StrongWind,
            20 => Condition::Windy,
            21 => Condition::Haze,
            _ => return None,
        };
        Some(condition)
    }

    pub const fn code(&self) -> i64 {
        match self {
            Condition::Clear => 1,
            Condition::MostlyClear => 2,
            Condition::PartlyCloudy => 3,
            Condition::MostlyCloudy => 4,
            Condition::Overcast => 5,
            Condition::Mist => 6,
            Condition::Fog => 7,
            Condition::Drizzle => 8,
            Condition::LightRain => 9,
            Condition::Rain => 10,
            Condition::HeavyRain => 11,
            Condition::Showers => 12,
            Condition::IsolatedThunderstorms => 13,
            Condition::Thunderstorms => 14,
            Condition::SevereThunderstorms => 15,
            Condition::Hail => 16,
            Condition::Snow => 17,
            Condition::Frost => 18,
            Condition::StrongWind => 19,
            Condition::Windy => 20,
            Condition::Haze => 21,
        }
    }

    /// Spanish display label used by `Display`.
    pub const fn label(&self) -> &'static str {
        match self {
            Condition::Clear => "Despejado",
            Condition::MostlyClear => "Poco nuboso",
            Condition::PartlyCloudy => "Nubosidad variable",
            Condition::MostlyCloudy => "Nuboso",
            Condition::Overcast => "Cubierto",
            Condition::Mist => "Neblina",
            Condition::Fog => "Niebla",
            Condition::Drizzle => "Lloviznas",
            Condition::LightRain => "Lluvias débiles",
            Condition::Rain => "Lluvias",
            Condition::HeavyRain => "Lluvias intensas",
            Condition::Showers => "Chaparrones",
            Condition::IsolatedThunderstorms => "Tormentas aisladas",
            Condition::Thunderstorms => "Tormentas",
            Condition::SevereThunderstorms => "Tormentas fuertes",
            Condition::Hail => "Granizo",
            Condition::Snow => "Nevadas",
            Condition::Frost => "Heladas",
            Condition::StrongWind => "Viento fuerte",
            Condition::Windy => "Ventoso",
            Condition::Haze => "Bruma",
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Condition::Clear => "clear",
            Condition::MostlyClear => "mostly_clear",
            Condition::PartlyCloudy => "partly_cloudy",
            Condition::MostlyCloudy => "mostly_cloudy",
            Condition::Overcast => "overcast",
            Condition::Mist => "mist",
            Condition::Fog => "fog",
            Condition::Drizzle => "drizzle",
            Condition::LightRain => "light_rain",
            Condition::Rain => "rain",
            Condition::HeavyRain => "heavy_rain",
            Condition::Showers => "showers",
            Condition::IsolatedThunderstorms => "isolated_thunderstorms",
            Condition::Thunderstorms => "thunderstorms",
            Condition::SevereThunderstorms => "severe_thunderstorms",
            Condition::Hail => "hail",
            Condition::Snow => "snow",
            Condition::Frost => "frost",
            Condition::StrongWind => "strong_wind",
            Condition::Windy => "windy",
            Condition::Haze => "haze",
        }
    }

    pub const fn all() -> &'static [Condition] {
        &[
            Condition::Clear,
            Condition::MostlyClear,
            Condition::PartlyCloudy,
            Condition::MostlyCloudy,
            Condition::Overcast,
            Condition::Mist,
            Condition::Fog,
            Condition::Drizzle,
            Condition::LightRain,
            Condition::Rain,
            Condition::HeavyRain,
            Condition::Showers,
            Condition::IsolatedThunderstorms,
            Condition::Thunderstorms,
            Condition::SevereThunderstorms,
            Condition::Hail,
            Condition::Snow,
            Condition::Frost,
            Condition::StrongWind,
            Condition::Windy,
            Condition::Haze,
        ]
    }

    /// Any precipitation or storm.
    pub const fn is_wet(&self) -> bool {
        matches!(
            self,
            Condition::Drizzle
                | Condition::LightRain
                | Condition::Rain
                | Condition::HeavyRain
                | Condition::Showers
                | Condition::IsolatedThunderstorms
                | Condition::Thunderstorms
                | Condition::SevereThunderstorms
                | Condition::Hail
                | Condition::Snow
        )
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<&str> for Condition {
    type Error = crate::InumetError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.trim().to_lowercase();

        Condition::all()
            .iter()
            .copied()
            .find(|c| c.as_str() == lower)
            .ok_or_else(|| crate::InumetError::invalid_input(format!("unknown condition '{value}'")))
    }
}
