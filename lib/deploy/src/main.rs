//! `kindlink`: deploys and verifies the Kindlink programs.
use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use eyre::{Context, ContextCompat};
use kindlink_deploy::{
    arguments::Arguments,
    descriptor::{all_modules, module_by_name},
    Artifacts, Deployment, Endpoint, Journal, Network, Orchestrator, Verifier,
};

#[derive(Debug, Parser)]
#[command(name = "kindlink")]
#[command(about = "Deploy the Kindlink Stylus programs", long_about = None)]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Whether to print debug info.
    #[arg(long, global = true)]
    verbose: bool,

    /// Workspace holding the programs and the deployment journal. Defaults
    /// to the workspace enclosing the current directory.
    #[arg(long, global = true, value_name = "PATH")]
    workspace: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Deploy a module, reusing the journaled instance if there is one.
    Deploy {
        /// Module to deploy, e.g. `kindlink` or `FoundationModule`.
        module: String,
        #[command(flatten)]
        target: Target,
        /// Verify the program's source once it is deployed.
        #[arg(long)]
        verify: bool,
    },
    /// Print the deployment descriptors.
    Plan {
        /// TOML file overriding constructor arguments.
        #[arg(long, value_name = "PATH")]
        argument_file: Option<PathBuf>,
    },
    /// Verify the journaled deployment of a module.
    Verify {
        /// Module to verify.
        module: String,
        /// Network the module was deployed to.
        #[arg(long, default_value = "sepolia")]
        network: Network,
    },
}

#[derive(Debug, clap::Args)]
struct Target {
    /// Network to deploy to.
    #[arg(long, default_value = "sepolia")]
    network: Network,
    /// TOML file overriding constructor arguments.
    #[arg(long, value_name = "PATH")]
    argument_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let log_level =
        if args.verbose { log::Level::Debug } else { log::Level::Info };
    if let Err(err) = simple_logger::init_with_level(log_level) {
        eprintln!("failed to set up logger: {err}");
    }

    let result = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(Into::into)
        .and_then(|rt| rt.block_on(exec(args.command, args.workspace)));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::FAILURE
        }
    }
}

async fn exec(
    command: Command,
    workspace: Option<PathBuf>,
) -> eyre::Result<()> {
    dotenv::dotenv().ok();
    let artifacts = workspace
        .map_or_else(Artifacts::discover, Artifacts::in_workspace);
    match command {
        Command::Deploy { module, target, verify } => {
            deploy(&module, target, verify, artifacts).await
        }
        Command::Plan { argument_file } => plan(argument_file),
        Command::Verify { module, network } => {
            verify_journaled(&module, network, artifacts).await
        }
    }
}

fn load_arguments(path: Option<PathBuf>) -> eyre::Result<Arguments> {
    path.map_or_else(|| Ok(Arguments::default()), Arguments::load)
}

fn endpoint(network: Network) -> eyre::Result<Endpoint> {
    Ok(Endpoint::for_network(network, |var| std::env::var(var).ok())?)
}

async fn deploy(
    module: &str,
    target: Target,
    verify: bool,
    artifacts: Artifacts,
) -> eyre::Result<()> {
    let arguments = load_arguments(target.argument_file)?;
    let descriptor = module_by_name(module, &arguments)?;
    let endpoint = endpoint(target.network)?;

    let journal = Journal::open(artifacts.workspace_root(), target.network)?;
    let manifest_dir = artifacts.manifest_dir(descriptor.contract());

    let deployment = Orchestrator::new(endpoint.clone())
        .with_artifacts(artifacts)
        .with_journal(journal)
        .run(&descriptor)
        .await?;

    let contract = deployment.contract();
    match deployment {
        Deployment::Deployed(_) => println!(
            "{}: deployed at {} (owner {})",
            descriptor.id(),
            contract.address,
            contract.owner
        ),
        Deployment::Reused(_) => println!(
            "{}: already deployed at {} (owner {})",
            descriptor.id(),
            contract.address,
            contract.owner
        ),
    }

    if verify {
        Verifier::new(endpoint)
            .verify(&manifest_dir, contract.address, contract.tx_hash)
            .await?;
    }
    Ok(())
}

fn plan(argument_file: Option<PathBuf>) -> eyre::Result<()> {
    let arguments = load_arguments(argument_file)?;
    for descriptor in all_modules(&arguments) {
        let argument = descriptor
            .constructor_argument()
            .map_or_else(|| "()".to_owned(), |arg| format!("{arg:?}"));
        println!("{}: {argument}", descriptor.id());
    }
    Ok(())
}

async fn verify_journaled(
    module: &str,
    network: Network,
    artifacts: Artifacts,
) -> eyre::Result<()> {
    let descriptor = module_by_name(module, &Arguments::default())?;
    let endpoint = endpoint(network)?;

    let journal = Journal::open(artifacts.workspace_root(), network)?;
    let entry = journal.get(&descriptor.id()).with_context(|| {
        format!("{} has no recorded deployment on {network}", descriptor.id())
    })?;

    Verifier::new(endpoint)
        .verify(
            &artifacts.manifest_dir(descriptor.contract()),
            entry.address,
            entry.tx_hash,
        )
        .await
        .wrap_err_with(|| format!("failed to verify {}", descriptor.id()))
}
