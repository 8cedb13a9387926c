use common::{Error, Result};

const IPFS_SCHEME: &str = "ipfs://";

/// Rewrites content-addressed metadata pointers into fetchable gateway
/// URLs. Pure string transform, no I/O.
#[derive(Debug, Clone)]
pub struct MetadataResolver {
    gateway_base: String,
}

impl MetadataResolver {
    pub fn new(gateway_base: &str) -> Self {
        Self {
            gateway_base: gateway_base.trim_end_matches('/').to_string(),
        }
    }

    /// Resolves a metadata pointer to an http(s) URL.
    ///
    /// `ipfs://<hash>` becomes `<gateway>/ipfs/<hash>`; already-resolved
    /// http(s) URLs pass through unchanged. Any other scheme is rejected.
    pub fn resolve(&self, pointer: &str) -> Result<String> {
        if let Some(hash) = pointer.strip_prefix(IPFS_SCHEME) {
            return Ok(format!("{}/ipfs/{}", self.gateway_base, hash));
        }

        if pointer.starts_with("http://") || pointer.starts_with("https://") {
            return Ok(pointer.to_string());
        }

        Err(Error::InvalidPointer(pointer.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_ipfs_pointers_to_gateway() {
        let resolver = MetadataResolver::new("https://gateway.test");
        assert_eq!(
            resolver.resolve("ipfs://QmYwAPJzv5CZsnA").unwrap(),
            "https://gateway.test/ipfs/QmYwAPJzv5CZsnA"
        );
    }

    #[test]
    fn trims_trailing_slash_from_gateway_base() {
        let resolver = MetadataResolver::new("https://gateway.test/");
        assert_eq!(
            resolver.resolve("ipfs://abc").unwrap(),
            "https://gateway.test/ipfs/abc"
        );
    }

    #[test]
    fn http_urls_pass_through_unchanged() {
        let resolver = MetadataResolver::new("https://gateway.test");
        for url in [
            "http://example.com/meta.json",
            "https://gateway.pinata.cloud/ipfs/QmYwAPJzv5CZsnA",
        ] {
            assert_eq!(resolver.resolve(url).unwrap(), url);
        }
    }

    #[test]
    fn resolution_is_idempotent() {
        let resolver = MetadataResolver::new("https://gateway.test");
        let resolved = resolver.resolve("ipfs://QmYwAPJzv5CZsnA").unwrap();
        assert_eq!(resolver.resolve(&resolved).unwrap(), resolved);
    }

    #[test]
    fn ipfs_pointers_always_land_on_the_gateway() {
        let resolver = MetadataResolver::new("https://gateway.test");
        for hash in ["", "Qm", "bafybeigdyrzt5", "with/path.json"] {
            let resolved = resolver.resolve(&format!("ipfs://{}", hash)).unwrap();
            assert!(resolved.starts_with("https://gateway.test/ipfs/"));
        }
    }

    #[test]
    fn unknown_schemes_are_rejected() {
        let resolver = MetadataResolver::new("https://gateway.test");
        for pointer in ["", "0x", "ftp://example.com/meta.json", "QmBareHash"] {
            assert!(matches!(
                resolver.resolve(pointer),
                Err(Error::InvalidPointer(_))
            ));
        }
    }
}
