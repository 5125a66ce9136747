//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports are the seams where the engine meets the outside world. Adapters
//! implement them; application services depend only on the traits.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!                    │  cache, aggregator,     │
//!     ┌──────────────┤  path engine, alerts    ├──────────────┐
//!     │              └─────────────────────────┘              │
//!     │                 │                 │                   │
//!     ▼                 ▼                 ▼                   ▼
//! ┌─────────┐     ┌───────────┐     ┌───────────┐      ┌───────────┐
//! │ Price   │     │  Catalog  │     │   Alert   │      │ Notifier  │
//! │ Source  │     │           │     │   Store   │      │           │
//! └─────────┘     └───────────┘     └───────────┘      └───────────┘
//! ```

pub mod outbound;
