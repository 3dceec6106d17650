use anyhow::Result;

fn main() -> Result<()> {
    env_logger::init();
    let args = visfin::args::parse();
    visfin::cli::main(args)
}
