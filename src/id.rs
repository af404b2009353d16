use rand::Rng;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::types::{AvatarFile, AvatarRef};

pub const TICKET_NUMBER_MIN: u32 = 100_000;
pub const TICKET_NUMBER_MAX: u32 = 999_999;

/// Draw a 6-digit ticket number, uniform over 100000..=999999
pub fn ticket_number<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    rng.gen_range(TICKET_NUMBER_MIN..=TICKET_NUMBER_MAX)
}

/// Build a displayable handle for an accepted avatar.
/// Each call yields a fresh `blob:` URL, like a browser object URL.
pub fn avatar_ref(file: &AvatarFile) -> AvatarRef {
    let mut hasher = Sha256::new();
    hasher.update(&file.data);
    let digest = hex::encode(hasher.finalize());

    AvatarRef {
        url: format!("blob:ticket-form/{}", Uuid::new_v4()),
        file_name: file.name.clone(),
        sha256: digest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn ticket_numbers_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10_000 {
            let n = ticket_number(&mut rng);
            assert!((TICKET_NUMBER_MIN..=TICKET_NUMBER_MAX).contains(&n));
            assert_eq!(n.to_string().len(), 6);
        }
    }

    #[test]
    fn avatar_refs_are_unique_per_selection() {
        let file = AvatarFile::new("me.png", b"png bytes".to_vec());
        let a = avatar_ref(&file);
        let b = avatar_ref(&file);

        assert_ne!(a.url, b.url);
        assert!(a.url.starts_with("blob:ticket-form/"));
        assert_eq!(a.sha256, b.sha256);
        assert_eq!(a.sha256.len(), 64);
        assert_eq!(a.file_name, "me.png");
    }
}
