use std::{fmt, fs::File, io, path::Path, str::FromStr};

use sha2::{Digest, Sha256, Sha512};

use crate::error::{HashError, HashResult};

/// Checksum algorithms a repository may declare for its metadata files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashAlgorithm {
    #[default]
    Sha256,
    Sha512,
    Blake3,
}

impl HashAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha512 => "sha512",
            HashAlgorithm::Blake3 => "blake3",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha256" => Ok(HashAlgorithm::Sha256),
            "sha512" => Ok(HashAlgorithm::Sha512),
            "blake3" => Ok(HashAlgorithm::Blake3),
            other => Err(HashError::UnknownAlgorithm(other.to_string())),
        }
    }
}

fn digest_file<D: Digest + io::Write>(file_path: &Path) -> io::Result<String> {
    let mut file = File::open(file_path)?;
    let mut hasher = D::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}

/// Calculates the hex-encoded checksum of a file with the given algorithm.
///
/// # Errors
///
/// * [`HashError::ReadFailed`] if the file cannot be read.
pub fn calculate_checksum<P: AsRef<Path>>(
    file_path: P,
    algorithm: HashAlgorithm,
) -> HashResult<String> {
    let file_path = file_path.as_ref();
    let result = match algorithm {
        HashAlgorithm::Sha256 => digest_file::<Sha256>(file_path),
        HashAlgorithm::Sha512 => digest_file::<Sha512>(file_path),
        HashAlgorithm::Blake3 => {
            let mut hasher = blake3::Hasher::new();
            hasher
                .update_mmap(file_path)
                .map(|hasher| hasher.finalize().to_hex().to_string())
        }
    };

    result.map_err(|err| {
        HashError::ReadFailed {
            path: file_path.to_path_buf(),
            source: err,
        }
    })
}
