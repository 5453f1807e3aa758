//! Typed packet constructors and parsers, one module per packet family.

pub mod error_response;
pub mod location;
pub mod report;
pub mod weather;

pub use error_response::{error_response, is_fatal_error, parse_error_response};
pub use location::{coordinate_request, coordinate_response, is_valid_coordinate, parse_coordinate_request, parse_coordinate_response};
pub use report::{parse_report_request, parse_report_response, report_request, report_response, SensorReading};
pub use weather::{parse_weather_response, weather_request, weather_response, WeatherRequestFlags, WeatherResponseData};
