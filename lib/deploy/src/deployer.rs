//! Deploys compiled programs with `cargo stylus deploy`.
use std::{
    io::Write,
    path::{Path, PathBuf},
};

use alloy::{
    hex,
    primitives::{keccak256, Address, TxHash},
    sol,
    sol_types::SolError,
    transports::http::reqwest::Url,
};
use eyre::{Context, ContextCompat};
use regex::Regex;
use tempfile::NamedTempFile;
use tokio::process::Command;

use crate::{config::Secret, constructor::Constructor, error::Error};

sol! {
    error ContractInitializationError(address newContract, bytes data);
    error ProgramUpToDate();
}

/// Outcome of a successful `cargo stylus deploy`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeploymentReceipt {
    /// Address the program was deployed at.
    pub contract_address: Address,
    /// Hash of the deployment transaction.
    pub tx_hash: TxHash,
}

/// The `StylusDeployer` factory reverted while running a constructor.
#[derive(Debug, thiserror::Error)]
#[error("constructor of {contract_address} reverted: 0x{revert_data}")]
pub struct ConstructorReverted {
    /// Address the program would have been deployed at.
    pub contract_address: Address,
    /// Hex encoded revert data.
    pub revert_data: String,
}

impl ConstructorReverted {
    /// Recovers a [`ConstructorReverted`] from an [`eyre::Report`].
    #[must_use]
    pub fn from_report(report: &eyre::Report) -> Option<&Self> {
        report.downcast_ref::<ConstructorReverted>()
    }
}

/// A configured `cargo stylus deploy` invocation.
#[derive(Clone, Debug)]
pub struct Deployer {
    rpc_url: Url,
    private_key: Secret,
    constructor: Option<Constructor>,
    deployer_address: Option<Address>,
    manifest_dir: Option<PathBuf>,
}

impl Deployer {
    /// Deployer sending transactions to `rpc_url`, signed with
    /// `private_key`.
    #[must_use]
    pub fn new(rpc_url: Url, private_key: Secret) -> Self {
        Self {
            rpc_url,
            private_key,
            constructor: None,
            deployer_address: None,
            manifest_dir: None,
        }
    }

    /// Run `constructor` through the `StylusDeployer` factory.
    #[must_use]
    pub fn with_constructor(mut self, constructor: Constructor) -> Self {
        self.constructor = Some(constructor);
        self
    }

    /// Use the factory at `address` instead of the toolchain's default.
    #[must_use]
    pub fn with_deployer_address(mut self, address: Address) -> Self {
        self.deployer_address = Some(address);
        self
    }

    /// Run `cargo stylus` in the program's manifest directory.
    #[must_use]
    pub fn with_manifest_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.manifest_dir = Some(dir.into());
        self
    }

    /// Arguments passed to `cargo` to deploy `wasm`, signing with the key
    /// stored in `key_file`.
    #[must_use]
    pub fn command_args(&self, wasm: &Path, key_file: &Path) -> Vec<String> {
        let mut args: Vec<String> = vec![
            "stylus".to_owned(),
            "deploy".to_owned(),
            "--no-verify".to_owned(),
            "-e".to_owned(),
            self.rpc_url.to_string(),
            "--private-key-path".to_owned(),
            key_file.display().to_string(),
            "--wasm-file".to_owned(),
            wasm.display().to_string(),
        ];

        if let Some(constructor) = &self.constructor {
            args.push("--constructor-signature".to_owned());
            args.push(constructor.signature.clone());
            if let Some(deployer) = self.deployer_address {
                args.push("--deployer-address".to_owned());
                args.push(deployer.to_checksum(None));
            }
            // Variadic, so it goes last.
            if !constructor.args.is_empty() {
                args.push("--constructor-args".to_owned());
                args.extend(constructor.args.iter().cloned());
            }
        }

        args
    }

    /// Deploys and activates the program compiled to `wasm`.
    ///
    /// # Errors
    ///
    /// May error if:
    ///
    /// - The private key cannot be written to a temporary file.
    /// - `cargo stylus` cannot be spawned.
    /// - The constructor reverts, reported as [`ConstructorReverted`].
    /// - The deployment fails otherwise, reported as [`Error::Deployment`].
    /// - The output does not name a contract address and transaction hash.
    pub async fn deploy_wasm(
        &self,
        wasm: &Path,
    ) -> eyre::Result<DeploymentReceipt> {
        // Removed when dropped, after `cargo stylus` exits.
        let key_file = write_key_file(&self.private_key)?;
        let mut command = Command::new("cargo");
        command.args(self.command_args(wasm, key_file.path()));
        if let Some(dir) = &self.manifest_dir {
            command.current_dir(dir);
        }

        log::debug!("running `cargo stylus deploy` for {}", wasm.display());
        let output = command
            .output()
            .await
            .context("failed to execute `cargo stylus deploy` command")?;

        let stdout = strip_ansi(&String::from_utf8_lossy(&output.stdout))?;
        if output.status.success() {
            parse_deploy_output(&stdout)
        } else {
            let stderr =
                strip_ansi(&String::from_utf8_lossy(&output.stderr))?;
            parse_deploy_error(&stdout, &stderr)
        }
    }
}

/// Extracts the contract address and transaction hash from the output of a
/// successful deployment.
///
/// # Errors
///
/// May fail if either value is missing.
pub fn parse_deploy_output(stdout: &str) -> eyre::Result<DeploymentReceipt> {
    let contract_addr_regex =
        Regex::new(r"deployed code at address:\s*(0x[a-fA-F0-9]{40})")
            .context("failed to create contract addr regex")?;
    let tx_hash_regex =
        Regex::new(r"deployment tx hash:\s*(0x[a-fA-F0-9]{64})")
            .context("failed to create tx hash regex")?;

    let contract_addr = contract_addr_regex
        .captures(stdout)
        .and_then(|cap| cap.get(1))
        .context(format!("no contract address found in output {stdout}"))?
        .as_str();
    let tx_hash = tx_hash_regex
        .captures(stdout)
        .and_then(|cap| cap.get(1))
        .context(format!("no transaction hash found in output {stdout}"))?
        .as_str();

    Ok(DeploymentReceipt {
        contract_address: contract_addr.parse().context(format!(
            "failed to parse contract address from string: {contract_addr}"
        ))?,
        tx_hash: tx_hash
            .parse()
            .context("failed to parse transaction hash")?,
    })
}

fn parse_deploy_error(
    stdout: &str,
    stderr: &str,
) -> eyre::Result<DeploymentReceipt> {
    let revert_data_regex =
        Regex::new(r#"data: Some\(String\("0x([a-fA-F0-9]+)"\)\)"#)
            .context("failed to create revert data regex")?;

    let Some(hex_str) = revert_data_regex
        .captures(stderr)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str())
    else {
        return Err(Error::Deployment(stderr.trim().to_owned()).into());
    };

    let data = hex::decode(hex_str)
        .context(format!("failed to decode hex: {hex_str}"))?;
    let selector = data.get(..4).unwrap_or_default();

    // Older factories revert with `ContractInitializationError(address)`.
    let legacy = keccak256("ContractInitializationError(address)");
    let is_init_error = selector == ContractInitializationError::SELECTOR
        || selector == &legacy[..4];
    if is_init_error && data.len() >= 36 {
        return Err(ConstructorReverted {
            contract_address: Address::from_slice(&data[16..36]),
            revert_data: hex_str.to_owned(),
        }
        .into());
    }

    // The dev node reports an already activated program as a revert even
    // though the deployment itself went through.
    if selector == ProgramUpToDate::SELECTOR {
        return parse_deploy_output(stdout);
    }

    Err(Error::Deployment(format!("reverted with 0x{hex_str}")).into())
}

/// Writes `key` to a temporary file only the current user can read.
fn write_key_file(key: &Secret) -> eyre::Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("kindlink-key-")
        .tempfile()
        .context("failed to create private key file")?;
    file.write_all(key.expose().as_bytes())
        .context("failed to write private key file")?;
    file.flush().context("failed to write private key file")?;
    Ok(file)
}

fn strip_ansi(s: &str) -> eyre::Result<String> {
    let re = Regex::new(r"\x1B\[[0-9;]*[a-zA-Z]")
        .context("failed to create ANSI escape regex")?;
    Ok(re.replace_all(s, "").into_owned())
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{address, Bytes};

    use super::*;

    const TX_HASH: &str =
        "0x0a7bc96b2a4ee43af5b2a4c8bd8d4a2a5d2c4cfc2f8d19f5c1e0e2aefc0c1a11";

    fn deployer() -> Deployer {
        Deployer::new(
            "http://localhost:8547".parse().unwrap(),
            Secret::new("0xkey"),
        )
    }

    const KEY_FILE: &str = "/tmp/kindlink-key-x";

    #[test]
    fn builds_plain_command() {
        let args = deployer().command_args(
            Path::new("/t/kindlink.wasm"),
            Path::new(KEY_FILE),
        );

        assert_eq!(
            args,
            [
                "stylus",
                "deploy",
                "--no-verify",
                "-e",
                "http://localhost:8547/",
                "--private-key-path",
                KEY_FILE,
                "--wasm-file",
                "/t/kindlink.wasm",
            ]
        );
    }

    #[test]
    fn puts_constructor_args_last() {
        let constructor = Constructor {
            signature: "constructor(string)".to_owned(),
            args: vec!["Kindlink Foundation".to_owned()],
        };
        let factory = address!("0x6ac4839Bfe169CadBBFbDE3f29bd8459037Bf64e");

        let args = deployer()
            .with_constructor(constructor)
            .with_deployer_address(factory)
            .command_args(
                Path::new("/t/foundation.wasm"),
                Path::new(KEY_FILE),
            );

        assert_eq!(
            args[9..],
            [
                "--constructor-signature",
                "constructor(string)",
                "--deployer-address",
                "0x6ac4839Bfe169CadBBFbDE3f29bd8459037Bf64e",
                "--constructor-args",
                "Kindlink Foundation",
            ]
        );
    }

    #[test]
    fn omits_empty_constructor_args() {
        let args = deployer()
            .with_constructor(Constructor::empty())
            .command_args(
                Path::new("/t/kindlink.wasm"),
                Path::new(KEY_FILE),
            );

        assert!(args.contains(&"constructor()".to_owned()));
        assert!(!args.contains(&"--constructor-args".to_owned()));
    }

    #[test]
    fn keeps_private_key_off_the_command_line() {
        let key_file = write_key_file(&Secret::new("0xkey")).unwrap();

        let args = deployer().command_args(
            Path::new("/t/kindlink.wasm"),
            key_file.path(),
        );

        assert!(!args.iter().any(|arg| arg.contains("0xkey")));
        assert_eq!(std::fs::read_to_string(key_file.path()).unwrap(), "0xkey");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode =
                key_file.as_file().metadata().unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    #[test]
    fn parses_colored_output() {
        let raw = format!(
            "deployed code at address: \x1b[1;94m0x33f4212b027e22af7e6ba21fc572843c0d701cd1\x1b[0m\n\
             deployment tx hash: \x1b[1;94m{TX_HASH}\x1b[0m\n"
        );

        let receipt = parse_deploy_output(&strip_ansi(&raw).unwrap()).unwrap();

        assert_eq!(
            receipt.contract_address,
            address!("0x33f4212b027e22af7e6ba21fc572843c0d701cd1")
        );
        assert_eq!(receipt.tx_hash, TX_HASH.parse::<TxHash>().unwrap());
    }

    #[test]
    fn reports_constructor_revert() {
        let contract = address!("0x33f4212b027e22af7e6ba21fc572843c0d701cd1");
        let data = ContractInitializationError {
            newContract: contract,
            data: Bytes::from_static(&[0xde, 0xad, 0xbe, 0xef]),
        }
        .abi_encode();
        let stderr = format!(
            "error: (code: 3, message: execution reverted, data: Some(String(\"0x{}\")))",
            hex::encode(&data)
        );

        let report = parse_deploy_error("", &stderr).unwrap_err();

        let reverted = ConstructorReverted::from_report(&report).unwrap();
        assert_eq!(reverted.contract_address, contract);
        assert_eq!(reverted.revert_data, hex::encode(&data));
        assert!(reverted.revert_data.contains("deadbeef"));
    }

    #[test]
    fn reports_other_failures_as_deployment_errors() {
        let report =
            parse_deploy_error("", "error: insufficient funds").unwrap_err();

        assert!(matches!(
            report.downcast_ref::<Error>(),
            Some(Error::Deployment(msg)) if msg == "error: insufficient funds"
        ));
    }

    #[test]
    fn accepts_program_up_to_date() {
        let stdout = format!(
            "deployed code at address: 0x33f4212b027e22af7e6ba21fc572843c0d701cd1\n\
             deployment tx hash: {TX_HASH}\n"
        );
        let stderr = format!(
            "data: Some(String(\"0x{}\"))",
            hex::encode(ProgramUpToDate::SELECTOR)
        );

        let receipt = parse_deploy_error(&stdout, &stderr).unwrap();

        assert_eq!(receipt.tx_hash, TX_HASH.parse::<TxHash>().unwrap());
    }
}
