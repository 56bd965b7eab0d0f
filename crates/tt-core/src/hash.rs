//! Stable hashing helpers.

use std::hash::Hasher;

use serde::Serialize;
use sha2::{Digest, Sha256};
use siphasher::sip::SipHasher13;

use crate::errors::TimetableError;
use crate::model::{CourseId, SectionId};
use crate::serde::to_canonical_json_bytes;

/// Computes a stable SHA256 hash of the canonical JSON form of `value`.
pub fn stable_hash_string<T: Serialize>(value: &T) -> Result<String, TimetableError> {
    let bytes = to_canonical_json_bytes(value)?;
    let digest = Sha256::digest(&bytes);
    Ok(format!("{:x}", digest))
}

/// Short identifier of an ordered list of section keys.
///
/// SipHash-1-3 with fixed zero keys over length-prefixed ids, so the value is
/// identical across processes and platforms.
pub fn schedule_digest<'a, I>(keys: I) -> String
where
    I: IntoIterator<Item = (&'a CourseId, &'a SectionId)>,
{
    let mut hasher = SipHasher13::new_with_keys(0, 0);
    for (course, section) in keys {
        write_str(&mut hasher, course.as_str());
        write_str(&mut hasher, section.as_str());
    }
    format!("{:016x}", hasher.finish())
}

fn write_str(hasher: &mut SipHasher13, value: &str) {
    hasher.write(&(value.len() as u64).to_le_bytes());
    hasher.write(value.as_bytes());
}
