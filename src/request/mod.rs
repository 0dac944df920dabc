//! Request Module
//!
//! Everything between the parameter store and the valuation engine:
//! payload building, the transport boundary and its cancellation token.

mod cancel;
pub mod payload;
mod response;
mod transport;

pub use cancel::CancellationToken;
pub use payload::{build, normalize, FieldValues, InputEntry, ValuationRequest};
pub use response::{PercentileSummary, PlotFragment, ValuationResponse};
pub use transport::{HttpTransport, TransportError, ValuationTransport};
