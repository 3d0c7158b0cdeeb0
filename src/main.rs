use anyhow::Result;

fn main() -> Result<()> {
    reorg::cli::run()
}
