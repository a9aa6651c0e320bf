use anyhow::Result;
use profiling_engine::DimensionRegistry;

use crate::OutputFormat;
use crate::output;

pub fn execute(format: OutputFormat) -> Result<()> {
    let registry = DimensionRegistry::with_defaults();
    output::print_dimensions(&registry, format)
}
