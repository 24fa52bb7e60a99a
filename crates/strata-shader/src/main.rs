use anyhow::Result;
use strata_shader::command::{
    compile_all,
    write_shared_header,
};

fn main() -> Result<()> {
    std::env::set_var("RUST_LOG", "debug");
    env_logger::init();
    write_shared_header()?;
    compile_all()?;
    Ok(())
}
