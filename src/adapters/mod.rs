//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter     | Implements     | Connects to                    |
//! |-------------|----------------|--------------------------------|
//! | `stdio`     | Transport      | stdin / stdout                 |
//! | `tcp`       | Transport      | plain TCP client socket        |
//! | `tls`       | Transport      | TCP + TLS (rustls client)      |
//! | `clock`     | Clock          | local wall clock, thread sleep |
//! | `log_file`  | TranscriptLog  | append-and-flush text file     |
//! | `sensor`    | SensorPort     | IIO sysfs ADC / simulated ADC  |

pub mod clock;
pub mod log_file;
mod poll;
pub mod sensor;
pub mod stdio;
pub mod tcp;
#[cfg(feature = "tls")]
pub mod tls;
