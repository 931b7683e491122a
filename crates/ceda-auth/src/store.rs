//! Persisting certificates, trust roots and the derived client config.

use crate::CredentialPaths;
use ceda_core::{CedaError, Result, TrustRoot};
use std::path::Path;
use tracing::{debug, info};

/// Create `dir` and its parents if needed
pub(crate) async fn ensure_dir(dir: &Path) -> Result<()> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| CedaError::io(dir, e))
}

/// Write trust roots that are not already present. Returns how many were written.
pub(crate) async fn write_trust_roots(dir: &Path, roots: &[TrustRoot]) -> Result<usize> {
    ensure_dir(dir).await?;

    let mut written = 0;
    for root in roots {
        let path = dir.join(&root.file_name);
        let exists = tokio::fs::try_exists(&path)
            .await
            .map_err(|e| CedaError::io(&path, e))?;
        if exists {
            debug!(path = %path.display(), "trust root already present");
            continue;
        }
        tokio::fs::write(&path, &root.content)
            .await
            .map_err(|e| CedaError::io(&path, e))?;
        written += 1;
    }

    info!(dir = %dir.display(), total = roots.len(), written, "trust roots bootstrapped");
    Ok(written)
}

/// Overwrite the credential file with the certificate chain followed by the
/// private key. Owner-only permissions on Unix.
pub(crate) async fn write_credentials(path: &Path, chain_pem: &str, key_pem: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent).await?;
    }

    let mut content = String::with_capacity(chain_pem.len() + key_pem.len() + 1);
    content.push_str(chain_pem);
    if !chain_pem.ends_with('\n') {
        content.push('\n');
    }
    content.push_str(key_pem);

    tokio::fs::write(path, content)
        .await
        .map_err(|e| CedaError::io(path, e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
            .await
            .map_err(|e| CedaError::io(path, e))?;
    }

    Ok(())
}

/// Contents of the derived client config
pub(crate) fn dodsrc_contents(paths: &CredentialPaths) -> String {
    format!(
        "HTTP.COOKIEJAR={}\nHTTP.SSL.CERTIFICATE={}\nHTTP.SSL.KEY={}\nHTTP.SSL.CAPATH={}\n",
        paths.cookie_jar.display(),
        paths.credentials.display(),
        paths.credentials.display(),
        paths.trustroots_dir.display(),
    )
}

/// Write the derived client config, if one is configured
pub(crate) async fn write_dodsrc(paths: &CredentialPaths) -> Result<()> {
    let Some(dodsrc) = &paths.dodsrc else {
        return Ok(());
    };
    if let Some(parent) = dodsrc.parent() {
        ensure_dir(parent).await?;
    }
    tokio::fs::write(dodsrc, dodsrc_contents(paths))
        .await
        .map_err(|e| CedaError::io(dodsrc, e))
}

/// Every `CERTIFICATE` block found in the trust-roots directory, re-encoded as PEM.
/// Unreadable entries are skipped.
pub(crate) async fn load_trust_roots(dir: &Path) -> Result<Vec<Vec<u8>>> {
    let mut roots = Vec::new();
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(roots),
        Err(e) => return Err(CedaError::io(dir, e)),
    };

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| CedaError::io(dir, e))?
    {
        let path = entry.path();
        let data = match tokio::fs::read(&path).await {
            Ok(data) => data,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "skipping trust root");
                continue;
            }
        };
        match pem::parse_many(&data) {
            Ok(blocks) => roots.extend(
                blocks
                    .iter()
                    .filter(|p| p.tag() == "CERTIFICATE")
                    .map(|p| pem::encode(p).into_bytes()),
            ),
            Err(e) => debug!(path = %path.display(), error = %e, "skipping trust root"),
        }
    }

    Ok(roots)
}
