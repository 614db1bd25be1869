//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements  | Connects to                    |
//! |---------------|-------------|--------------------------------|
//! | `sim_motion`  | MotionPort  | Synthetic attitude source      |
//! | `timer`       | TimerPort   | Polled one-shot deadline       |
//! | `log_sink`    | EventSink   | `log` facade                   |
//! | `config_file` | ConfigPort  | JSON file on disk              |
//! | `time`        | —           | Monotonic clock for the loop   |

pub mod config_file;
pub mod log_sink;
pub mod sim_motion;
pub mod time;
pub mod timer;
