//! Invader Core - real-time single-channel noise gate
//!
//! This crate holds the complete gating signal path, designed to run once per
//! sample inside an audio callback: no allocation, no locking and no I/O on
//! the processing path.
//!
//! # Signal Path
//!
//! ```text
//! input ─► × input gain ─┬─────────────────────────────────────► × G ─► × output gain ─► output
//!                        │                                        ▲
//!                        └─► PreFilter ─► Envelope ─► Curve ─► Smoother
//! ```
//!
//! The detector only ever sees a band-limited copy of the signal; the audio
//! itself is scaled by the smoothed gain `G` and nothing else. The gate adds
//! no latency.
//!
//! # Building Blocks
//!
//! - [`ResponseCurve`] - Decade/octave warps for control positions
//! - [`PreFilter`] / [`OnePole`] - Detection band-limiting (60 Hz – 4 kHz)
//! - [`EnvelopeDetector`] - Attack/release level tracker
//! - [`ExpanderCurve`] - Static soft-knee downward-expander transfer curve
//! - [`GainSmoother`] - Direction-dependent smoothing of the applied gain
//!
//! # Processing
//!
//! - [`Kernel`] - Owns the stages above, takes engineering-unit parameters
//! - [`NoiseGate`] - Normalized parameter front end that owns a [`Kernel`]
//! - [`GateParam`] / [`GateParams`] - The eight controls and their mappings
//! - [`Effect`] - Object-safe processing trait implemented by [`NoiseGate`]
//!
//! # Example
//!
//! ```rust
//! use invader_core::{Effect, GateParam, NoiseGate};
//!
//! let mut gate = NoiseGate::new(48000.0);
//! gate.set_display(GateParam::ThresholdDb, -45.0);
//! gate.set_display(GateParam::Ratio, 8.0);
//!
//! // Silence: the gate closes
//! let silence = [0.0f32; 4800];
//! let mut out = [0.0f32; 4800];
//! gate.process_block(&silence, &mut out);
//! assert!(gate.gain() < 0.01);
//! ```
//!
//! # no_std Support
//!
//! Disable the default `std` feature for embedded targets. The response
//! curves are then evaluated in closed form instead of through lookup tables.
//!
//! ```toml
//! [dependencies]
//! invader-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Logging
//!
//! With the `tracing` feature, construction and sample-rate changes emit
//! `tracing` debug events. Nothing is logged from the processing path.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod curve;
pub mod effect;
pub mod envelope;
pub mod filter;
pub mod gate;
pub mod kernel;
pub mod math;
pub mod param;
pub mod response;
pub mod smoother;

pub use curve::ExpanderCurve;
pub use effect::Effect;
pub use envelope::EnvelopeDetector;
pub use filter::{DEFAULT_HIGHPASS_HZ, DEFAULT_LOWPASS_HZ, OnePole, PreFilter};
pub use gate::NoiseGate;
pub use kernel::{DEFAULT_SAMPLE_RATE, Kernel, KernelCoefficients};
pub use math::{db_to_gain, flush_denormal, gain_to_db, ms_to_coefficient, ms_to_samples, sanitize};
pub use param::{GateParam, GateParams, ParamDescriptor, ParamUnit};
pub use response::{ResponseCurve, init_tables};
pub use smoother::GainSmoother;
