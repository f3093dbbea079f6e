use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::types::ComputationOutput;
use crate::FinCalcResult;

/// Shared interface every calculator implements.
///
/// Implementations are stateless unit structs; `calculate` is a pure function
/// of its input, so drivers may call any calculator from any thread.
pub trait Calculator {
    type Input: Serialize + DeserializeOwned;
    type Output: Serialize;

    /// Stable identifier used by drivers (CLI subcommands, bindings, logs).
    const NAME: &'static str;

    fn calculate(input: &Self::Input) -> FinCalcResult<ComputationOutput<Self::Output>>;
}
