use clap::Parser;
use krozek::cli::{Cli, Commands, GlobalOpts};
use miette::Result;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior so piping into `head` exits quietly
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;
    init_logging(&global);

    match cli.command {
        Commands::ListStudents => krozek::cli::commands::students::run(&global),
        Commands::CreateRepos => krozek::cli::commands::repos::run_create(&global),
        Commands::DeleteRepos => krozek::cli::commands::repos::run_delete(&global),
        Commands::Push(args) => krozek::cli::commands::push::run(args, &global),
        Commands::InviteStudents => krozek::cli::commands::invite::run_invite(&global),
        Commands::CheckInvitations => krozek::cli::commands::invite::run_check(&global),
        Commands::Init(args) => krozek::cli::commands::init::run(args),
        Commands::Completions(args) => krozek::cli::commands::completions::run(args),
    }
}

/// Log to stderr; `RUST_LOG` wins over the verbosity flags
fn init_logging(global: &GlobalOpts) {
    let default_level = if global.verbose {
        "krozek=debug"
    } else if global.quiet {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}
