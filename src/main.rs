//! Vitrine - client-side navigation runtime for static sites.

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use clap::{ColorChoice, Parser};
    use vitrine::SiteConfig;
    use vitrine::cli::{Cli, Commands};

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    vitrine::logger::set_verbose(cli.verbose);

    match &cli.command {
        Commands::Config => {
            print!("{}", SiteConfig::template());
            Ok(())
        }
        Commands::Base { url, root } => {
            let config = SiteConfig::load(&cli.config)?;
            vitrine::cli::base::print_base(url, root.as_deref(), &config)
        }
        Commands::Check { args } => {
            let config = SiteConfig::load(&cli.config)?;
            tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?
                .block_on(vitrine::cli::check::check_command(args, &config))
        }
    }
}

/// The browser entry point is `vitrine::web::start`.
#[cfg(target_arch = "wasm32")]
fn main() {}
