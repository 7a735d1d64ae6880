//! Sensor data acquisition module
//!
//! Handles ingestion of accelerometer reading files.

pub mod line_format;

pub use line_format::{
    load_readings, parse_line, parse_lines, read_lines, readings_to_lines, save_readings,
    write_readings,
};
