//! Subprocess plumbing against stand-in shell scripts
//!
//! All scripts are written before anything is spawned, and everything runs
//! in a single test, so no child ever inherits a script's open write handle.
#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use tempfile::tempdir;
use vpnctl_core::auth::CotpGenerator;
use vpnctl_core::error::{AuthError, VpnError};
use vpnctl_core::types::{MasterPassword, OtpCode};
use vpnctl_core::vpn::{PritunlClient, VpnClient};

const FAKE_CLIENT: &str = r#"#!/bin/sh
case "$1" in
  list)
    echo '[{"id":"abc","name":"sso_AckoDevVPNUsers","status":"3 mins","client_address":"10.1.0.4","connected":true}]'
    ;;
  start)
    echo "$*"
    ;;
  stop)
    echo "profile busy" >&2
    exit 1
    ;;
esac
"#;

const NOISY_CLIENT: &str = r#"#!/bin/sh
echo "[]"
echo "warning: service not responding" >&2
"#;

const FAKE_COTP: &str = r#"#!/bin/sh
pw=$(cat)
if [ "$pw" = "s3cret" ] && [ "$4" = "devvpn" ]; then
  echo " 123456"
else
  echo "bad password" >&2
  exit 3
fi
"#;

const SILENT_COTP: &str = r#"#!/bin/sh
cat > /dev/null
"#;

fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

#[tokio::test]
async fn test_subprocess_integration() {
    let dir = tempdir().unwrap();
    let fake_client = script(dir.path(), "pritunl-client", FAKE_CLIENT);
    let noisy_client = script(dir.path(), "noisy-client", NOISY_CLIENT);
    let fake_cotp = script(dir.path(), "cotp", FAKE_COTP);
    let silent_cotp = script(dir.path(), "silent-cotp", SILENT_COTP);

    // Listing is parsed from stdout
    let client = PritunlClient::new(fake_client);
    let profiles = client.list_profiles().await.unwrap();
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0].id, "abc");
    assert!(profiles[0].connected);
    assert_eq!(profiles[0].client_address.as_deref(), Some("10.1.0.4"));

    // The code rides along as --password
    let code = OtpCode::new("123456".to_string());
    let output = client.start("abc", Some(&code)).await.unwrap();
    assert_eq!(output, "start abc --password 123456");
    assert_eq!(client.start("abc", None).await.unwrap(), "start abc");

    // Non-zero exit carries stderr, and never the code
    match client.stop("abc").await.unwrap_err() {
        VpnError::CommandFailed { command, reason } => {
            assert_eq!(command, "stop abc");
            assert!(reason.contains("profile busy"), "reason: {}", reason);
        }
        other => panic!("Expected CommandFailed, got {:?}", other),
    }

    // Anything on stderr is a failure even with a zero exit
    let noisy = PritunlClient::new(noisy_client);
    match noisy.list_profiles().await.unwrap_err() {
        VpnError::CommandFailed { reason, .. } => {
            assert_eq!(reason, "warning: service not responding");
        }
        other => panic!("Expected CommandFailed, got {:?}", other),
    }

    // Master password goes in on stdin, trimmed code comes out
    let generator = CotpGenerator::new("svc".to_string(), "alice".to_string(), fake_cotp);
    let password = MasterPassword::new("s3cret".to_string());
    let code = generator
        .generate_with_password(&password, "devvpn")
        .await
        .unwrap();
    assert_eq!(code.expose(), "123456");

    let wrong = MasterPassword::new("nope".to_string());
    match generator
        .generate_with_password(&wrong, "devvpn")
        .await
        .unwrap_err()
    {
        AuthError::GeneratorFailed { reason } => assert!(reason.contains("bad password")),
        other => panic!("Expected GeneratorFailed, got {:?}", other),
    }

    let silent = CotpGenerator::new("svc".to_string(), "alice".to_string(), silent_cotp);
    assert_eq!(
        silent
            .generate_with_password(&password, "devvpn")
            .await
            .unwrap_err(),
        AuthError::EmptyCode
    );
}
