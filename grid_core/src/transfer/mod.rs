pub mod amount;
pub mod initiator;

pub use amount::{
    format_units, parse_units, Amount, AmountBounds, AmountError, ParseUnitsError, DECIMALS,
};
pub use initiator::submit_transfer;
