//! SSH command runner
//!
//! Opens an SSH session to a host and runs a single command, returning the
//! captured stdout/stderr and exit status. Authentication prefers an
//! explicit key file, then a stored password, then the local SSH agent.
//!
//! The ssh2 session API is blocking, so each command runs on the blocking
//! thread pool.

use aiops_core::domain::host::Host;
use async_trait::async_trait;
use ssh2::Session;
use std::io::Read;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::SshError;
use crate::executor::{CommandOutput, CommandRunner};

const SSH_PORT: u16 = 22;
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Production SSH-backed command runner
#[derive(Debug, Clone)]
pub struct SshCommandRunner {
    connect_timeout: Duration,
}

impl SshCommandRunner {
    pub fn new() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    pub fn with_connect_timeout(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }

    /// Probes a host: TCP reachability on port 22 followed by an
    /// authenticated no-op command. Backs the host "test connection"
    /// endpoint.
    pub async fn test_connection(&self, host: &Host) -> Result<String, SshError> {
        let host = host.clone();
        let timeout = self.connect_timeout;
        tokio::task::spawn_blocking(move || {
            let addr = resolve_addr(host.connect_address())?;
            let probe_timeout = timeout.min(Duration::from_secs(5));
            TcpStream::connect_timeout(&addr, probe_timeout).map_err(|e| {
                SshError::Connection {
                    address: addr.to_string(),
                    message: format!("cannot reach port 22: {}", e),
                }
            })?;

            let session = open_session(&host, timeout)?;
            exec(&session, "echo 'SSH connection successful'")?;
            Ok("SSH connection successful".to_string())
        })
        .await
        .map_err(|e| SshError::Session(format!("probe task failed: {}", e)))?
    }
}

impl Default for SshCommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandRunner for SshCommandRunner {
    async fn run_command(&self, host: &Host, command: &str) -> Result<CommandOutput, SshError> {
        info!(
            "Executing command on {}@{}",
            host.ssh_user,
            host.connect_address()
        );

        let host = host.clone();
        let command = command.to_string();
        let timeout = self.connect_timeout;
        tokio::task::spawn_blocking(move || {
            let session = open_session(&host, timeout)?;
            exec(&session, &command)
        })
        .await
        .map_err(|e| SshError::Session(format!("exec task failed: {}", e)))?
    }
}

fn resolve_addr(address: &str) -> Result<SocketAddr, SshError> {
    (address, SSH_PORT)
        .to_socket_addrs()
        .map_err(|e| SshError::Connection {
            address: address.to_string(),
            message: format!("address resolution failed: {}", e),
        })?
        .next()
        .ok_or_else(|| SshError::Connection {
            address: address.to_string(),
            message: "address resolved to nothing".to_string(),
        })
}

fn open_session(host: &Host, connect_timeout: Duration) -> Result<Session, SshError> {
    let address = host.connect_address();
    let addr = resolve_addr(address)?;

    let stream =
        TcpStream::connect_timeout(&addr, connect_timeout).map_err(|e| SshError::Connection {
            address: address.to_string(),
            message: e.to_string(),
        })?;

    let mut session = Session::new().map_err(|e| SshError::Session(e.to_string()))?;
    session.set_tcp_stream(stream);
    session
        .handshake()
        .map_err(|e| SshError::Session(format!("handshake failed: {}", e)))?;

    authenticate(&session, host)?;
    Ok(session)
}

fn authenticate(session: &Session, host: &Host) -> Result<(), SshError> {
    let auth_err = |message: String| SshError::Auth {
        user: host.ssh_user.clone(),
        address: host.connect_address().to_string(),
        message,
    };

    if let Some(key_path) = host.ssh_key_path.as_deref().filter(|p| !p.is_empty()) {
        debug!("Authenticating with explicit key file {}", key_path);
        session
            .userauth_pubkey_file(&host.ssh_user, None, Path::new(key_path), None)
            .map_err(|e| auth_err(e.to_string()))
    } else if let Some(password) = host.password.as_deref().filter(|p| !p.is_empty()) {
        debug!("Authenticating with stored password");
        session
            .userauth_password(&host.ssh_user, password)
            .map_err(|e| auth_err(e.to_string()))
    } else {
        debug!("No explicit credentials stored, trying SSH agent keys");
        let mut agent = session.agent().map_err(|e| auth_err(e.to_string()))?;
        agent.connect().map_err(|e| auth_err(e.to_string()))?;
        agent
            .list_identities()
            .map_err(|e| auth_err(e.to_string()))?;

        for identity in agent.identities().map_err(|e| auth_err(e.to_string()))? {
            if agent.userauth(&host.ssh_user, &identity).is_ok() {
                return Ok(());
            }
        }
        Err(auth_err("no agent identity was accepted".to_string()))
    }
}

fn exec(session: &Session, command: &str) -> Result<CommandOutput, SshError> {
    let mut channel = session
        .channel_session()
        .map_err(|e| SshError::Session(e.to_string()))?;
    channel
        .exec(command)
        .map_err(|e| SshError::Session(e.to_string()))?;

    let mut stdout = String::new();
    channel
        .read_to_string(&mut stdout)
        .map_err(|e| SshError::Session(e.to_string()))?;

    let mut stderr = String::new();
    channel
        .stderr()
        .read_to_string(&mut stderr)
        .map_err(|e| SshError::Session(e.to_string()))?;

    channel
        .wait_close()
        .map_err(|e| SshError::Session(e.to_string()))?;
    let exit_code = channel
        .exit_status()
        .map_err(|e| SshError::Session(e.to_string()))?;

    Ok(CommandOutput {
        stdout,
        stderr,
        exit_code,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn unreachable_host() -> Host {
        Host {
            id: Uuid::new_v4(),
            name: "unreachable".to_string(),
            // TEST-NET-1, guaranteed non-routable
            address: "192.0.2.1".to_string(),
            os_type: "Linux".to_string(),
            distro: None,
            ssh_user: "ops".to_string(),
            ssh_key_path: None,
            password: None,
            location: None,
            description: None,
            group_id: None,
        }
    }

    #[test]
    fn test_default_connect_timeout_is_single_digit_seconds() {
        assert!(SshCommandRunner::new().connect_timeout <= Duration::from_secs(9));
    }

    #[tokio::test]
    async fn test_connect_error_is_captured_not_raised() {
        let runner = SshCommandRunner::with_connect_timeout(Duration::from_millis(200));
        let err = runner
            .run_command(&unreachable_host(), "uptime")
            .await
            .unwrap_err();
        assert!(matches!(err, SshError::Connection { .. }));
        assert!(err.to_string().contains("192.0.2.1"));
    }

    #[tokio::test]
    async fn test_probe_reports_unreachable_port() {
        let runner = SshCommandRunner::with_connect_timeout(Duration::from_millis(200));
        let err = runner
            .test_connection(&unreachable_host())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("192.0.2.1"));
    }
}
