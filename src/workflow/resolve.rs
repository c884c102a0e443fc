use super::GenerationContext;
use crate::cli::ResolveArgs;
use anyhow::Result;

/// Print the resolved config as JSON.
pub fn run_resolve(args: &ResolveArgs) -> Result<()> {
    let ctx = GenerationContext::load(&args.project)?;
    let resolved = ctx.resolve()?;
    println!("{}", serde_json::to_string_pretty(&resolved)?);
    Ok(())
}
