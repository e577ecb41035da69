mod day_night;
mod growth;
mod weather;

pub use day_night::{DayNightSystem, DAY_NIGHT_PERIOD_UNITS};
pub use growth::{GrowthSystem, GROWTH_PERIOD_UNITS};
pub use weather::{WeatherSystem, WEATHER_PERIOD_UNITS};
