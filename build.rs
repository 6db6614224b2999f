#![deny(clippy::implicit_return)]
#![allow(clippy::needless_return)]

use anyhow::Result;
use vergen::EmitBuilder;

fn main() -> Result<()> {
    println!("cargo:rerun-if-changed=assets/locales");
    EmitBuilder::builder().build_date().all_git().emit()?;

    return Ok(());
}
