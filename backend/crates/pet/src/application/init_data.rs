//! initData Verification
//!
//! The chat platform hands the mini-app a URL-encoded, signed payload
//! (`initData`). The backend trusts the caller's identity only after
//! recomputing the signature:
//!
//! 1. parse the query string into fields and pull out `hash`
//! 2. validate `auth_date` (integer) and `user` (JSON with integer `id`)
//! 3. build the data-check string: remaining fields sorted by key, joined
//!    as `key=value` lines
//! 4. key = SHA-256(bot token); expected = HMAC-SHA256(key, data-check)
//! 5. compare with `hash` in constant time, then check `auth_date` age
//!
//! Parsing is finished before any cryptography runs, so ill-formed input
//! never reaches the HMAC comparison.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;

use crate::domain::value_objects::UserIdentity;
use crate::error::{PetError, RejectionReason};

const HASH_FIELD: &str = "hash";
const AUTH_DATE_FIELD: &str = "auth_date";
const USER_FIELD: &str = "user";
const QUERY_ID_FIELD: &str = "query_id";

/// User object embedded in initData
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WebAppUser {
    pub id: i64,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub language_code: Option<String>,
    #[serde(default)]
    pub is_premium: Option<bool>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

/// initData whose signature and age have been checked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedInitData {
    pub user: Option<WebAppUser>,
    /// Unix seconds at which the platform issued the payload
    pub auth_date: i64,
    pub query_id: Option<String>,
}

impl VerifiedInitData {
    /// Identity of the embedded user, if the payload carries one
    pub fn identity(&self) -> Option<UserIdentity> {
        self.user
            .as_ref()
            .map(|user| UserIdentity::from_user_id(user.id))
    }
}

/// Outcome of verifying a raw initData string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitDataVerdict {
    Valid(VerifiedInitData),
    /// Wrong calling context: the string is not initData at all
    Malformed(String),
    InvalidSignature,
    Expired,
}

impl InitDataVerdict {
    /// Map onto the error taxonomy; `Valid` becomes `Ok`
    pub fn into_result(self) -> Result<VerifiedInitData, PetError> {
        match self {
            InitDataVerdict::Valid(data) => Ok(data),
            InitDataVerdict::Malformed(reason) => Err(PetError::MalformedInitData(reason)),
            InitDataVerdict::InvalidSignature => Err(PetError::InitDataRejected(
                RejectionReason::InvalidSignature,
            )),
            InitDataVerdict::Expired => Err(PetError::InitDataRejected(RejectionReason::Expired)),
        }
    }
}

/// Structurally valid initData, not yet authenticated
#[derive(Debug, Clone)]
struct ParsedInitData {
    /// Every field except `hash`, ordered by key
    fields: BTreeMap<String, String>,
    hash: String,
    auth_date: i64,
    user: Option<WebAppUser>,
}

impl ParsedInitData {
    fn parse(raw: &str) -> Result<Self, String> {
        let mut fields = BTreeMap::new();
        for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
            if key.is_empty() {
                return Err("empty field name".to_string());
            }
            let key = key.into_owned();
            if fields.contains_key(&key) {
                return Err(format!("duplicate field `{key}`"));
            }
            fields.insert(key, value.into_owned());
        }

        if fields.is_empty() {
            return Err("no fields".to_string());
        }

        let hash = fields
            .remove(HASH_FIELD)
            .ok_or_else(|| format!("missing `{HASH_FIELD}`"))?;

        let auth_date = fields
            .get(AUTH_DATE_FIELD)
            .ok_or_else(|| format!("missing `{AUTH_DATE_FIELD}`"))?
            .parse::<i64>()
            .map_err(|_| format!("`{AUTH_DATE_FIELD}` is not an integer"))?;

        let user = fields
            .get(USER_FIELD)
            .map(|raw_user| {
                serde_json::from_str::<WebAppUser>(raw_user)
                    .map_err(|e| format!("`{USER_FIELD}` is not a user object: {e}"))
            })
            .transpose()?;

        Ok(Self {
            fields,
            hash,
            auth_date,
            user,
        })
    }

    fn data_check_string(&self) -> String {
        build_data_check_string(&self.fields)
    }

    fn query_id(&self) -> Option<String> {
        self.fields.get(QUERY_ID_FIELD).cloned()
    }
}

/// Sorted `key=value` lines joined with `\n`
///
/// `BTreeMap` iterates in byte-wise key order, which is the order the
/// platform signs in.
pub fn build_data_check_string(fields: &BTreeMap<String, String>) -> String {
    fields
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// HMAC key derived from the bot token
pub fn derive_secret_key(bot_token: &str) -> [u8; 32] {
    platform::crypto::sha256(bot_token.as_bytes())
}

/// Verify `raw` against `bot_token`
///
/// `now` is Unix seconds; the payload is expired once
/// `auth_date + max_age < now`.
pub fn verify(raw: &str, bot_token: &str, max_age: Duration, now: i64) -> InitDataVerdict {
    InitDataVerifier::new(bot_token, max_age).verify(raw, now)
}

/// Verifier with the secret key derived once
#[derive(Clone)]
pub struct InitDataVerifier {
    secret_key: [u8; 32],
    max_age: Duration,
}

impl InitDataVerifier {
    pub fn new(bot_token: &str, max_age: Duration) -> Self {
        Self {
            secret_key: derive_secret_key(bot_token),
            max_age,
        }
    }

    pub fn verify(&self, raw: &str, now: i64) -> InitDataVerdict {
        let parsed = match ParsedInitData::parse(raw) {
            Ok(parsed) => parsed,
            Err(reason) => return InitDataVerdict::Malformed(reason),
        };

        // A hash that is not even hex cannot match; it is a forgery, not a
        // malformed payload.
        let Ok(provided) = platform::crypto::from_hex(&parsed.hash) else {
            return InitDataVerdict::InvalidSignature;
        };

        let data_check = parsed.data_check_string();
        if !platform::crypto::verify_hmac_sha256(&self.secret_key, data_check.as_bytes(), &provided)
        {
            return InitDataVerdict::InvalidSignature;
        }

        let max_age_secs = i64::try_from(self.max_age.as_secs()).unwrap_or(i64::MAX);
        if parsed.auth_date.saturating_add(max_age_secs) < now {
            return InitDataVerdict::Expired;
        }

        let query_id = parsed.query_id();
        InitDataVerdict::Valid(VerifiedInitData {
            user: parsed.user,
            auth_date: parsed.auth_date,
            query_id,
        })
    }
}

impl std::fmt::Debug for InitDataVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InitDataVerifier")
            .field("secret_key", &"[REDACTED]")
            .field("max_age", &self.max_age)
            .finish()
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    const BOT_TOKEN: &str = "7342037359:AAHI25ES9xCOMPWYWRBDNGjqYTvbu4QrYoA";
    const ISSUED: i64 = 1_700_000_000;
    const DAY: Duration = Duration::from_secs(86_400);

    /// Signed independently of this module with the SHA-256(bot token) key,
    /// not a token issued by the chat platform
    const SIGNED_FIXTURE: &str = "query_id=AAHdF6IQAAAAAN0XohDhrOrc&user=%7B%22id%22%3A279058397%2C%22first_name%22%3A%22Vladislav%22%2C%22last_name%22%3A%22Kibenko%22%2C%22username%22%3A%22vdkfrost%22%2C%22language_code%22%3A%22ru%22%2C%22is_premium%22%3Atrue%2C%22allows_write_to_pm%22%3Atrue%7D&auth_date=1700000000&hash=2428491c259e592fe1196ef276c7a9714d3cbaf82b660462458d927eb8613278";
    const SIGNED_FIXTURE_HASH: &str =
        "2428491c259e592fe1196ef276c7a9714d3cbaf82b660462458d927eb8613278";

    fn expect_valid(verdict: InitDataVerdict) -> VerifiedInitData {
        match verdict {
            InitDataVerdict::Valid(data) => data,
            other => panic!("expected Valid, got {other:?}"),
        }
    }

    fn expect_malformed(raw: &str) {
        let verdict = verify(raw, BOT_TOKEN, DAY, ISSUED);
        assert!(
            matches!(verdict, InitDataVerdict::Malformed(_)),
            "{raw:?} gave {verdict:?}"
        );
    }

    #[test]
    fn test_signed_fixture_verifies() {
        let data = expect_valid(verify(SIGNED_FIXTURE, BOT_TOKEN, DAY, ISSUED + 60));

        assert_eq!(data.identity(), Some(UserIdentity::new("279058397")));
        assert_eq!(data.auth_date, ISSUED);
        assert_eq!(data.query_id.as_deref(), Some("AAHdF6IQAAAAAN0XohDhrOrc"));

        let user = data.user.unwrap();
        assert_eq!(user.first_name.as_deref(), Some("Vladislav"));
        assert_eq!(user.username.as_deref(), Some("vdkfrost"));
        assert_eq!(user.is_premium, Some(true));
    }

    #[test]
    fn test_signed_fixture_data_check_string() {
        let parsed = ParsedInitData::parse(SIGNED_FIXTURE).unwrap();
        assert_eq!(parsed.hash, SIGNED_FIXTURE_HASH);
        assert_eq!(
            parsed.data_check_string(),
            "auth_date=1700000000\n\
             query_id=AAHdF6IQAAAAAN0XohDhrOrc\n\
             user={\"id\":279058397,\"first_name\":\"Vladislav\",\"last_name\":\"Kibenko\",\"username\":\"vdkfrost\",\"language_code\":\"ru\",\"is_premium\":true,\"allows_write_to_pm\":true}"
        );

        let mac = platform::crypto::hmac_sha256(
            &derive_secret_key(BOT_TOKEN),
            parsed.data_check_string().as_bytes(),
        );
        assert_eq!(hex::encode(mac), SIGNED_FIXTURE_HASH);
    }

    #[test]
    fn test_wrong_bot_token() {
        let verdict = verify(SIGNED_FIXTURE, "7342037359:other", DAY, ISSUED);
        assert_eq!(verdict, InitDataVerdict::InvalidSignature);
    }

    #[test]
    fn test_every_single_char_hash_change_is_rejected() {
        let prefix_len = SIGNED_FIXTURE.len() - SIGNED_FIXTURE_HASH.len();
        for i in 0..SIGNED_FIXTURE_HASH.len() {
            let mut hash: Vec<u8> = SIGNED_FIXTURE_HASH.bytes().collect();
            hash[i] = if hash[i] == b'0' { b'1' } else { b'0' };
            let raw = format!(
                "{}{}",
                &SIGNED_FIXTURE[..prefix_len],
                String::from_utf8(hash).unwrap()
            );
            assert_eq!(
                verify(&raw, BOT_TOKEN, DAY, ISSUED),
                InitDataVerdict::InvalidSignature,
                "position {i}"
            );
        }
    }

    #[test]
    fn test_non_hex_hash_is_invalid_signature() {
        let prefix_len = SIGNED_FIXTURE.len() - SIGNED_FIXTURE_HASH.len();
        let raw = format!("{}{}", &SIGNED_FIXTURE[..prefix_len], "zz".repeat(32));
        assert_eq!(
            verify(&raw, BOT_TOKEN, DAY, ISSUED),
            InitDataVerdict::InvalidSignature
        );
    }

    #[test]
    fn test_tampered_field_is_rejected() {
        let raw = SIGNED_FIXTURE.replace("279058397", "279058398");
        assert_eq!(
            verify(&raw, BOT_TOKEN, DAY, ISSUED),
            InitDataVerdict::InvalidSignature
        );
    }

    #[test]
    fn test_field_order_in_query_does_not_matter() {
        let forward = init_data_for(42, ISSUED, BOT_TOKEN);
        let reversed = forward.split('&').rev().collect::<Vec<_>>().join("&");
        let data = expect_valid(verify(&reversed, BOT_TOKEN, DAY, ISSUED));
        assert_eq!(data.identity(), Some(UserIdentity::new("42")));
    }

    #[test]
    fn test_expired() {
        let raw = init_data_for(42, ISSUED, BOT_TOKEN);
        let hour = Duration::from_secs(3600);

        expect_valid(verify(&raw, BOT_TOKEN, hour, ISSUED + 3600));
        assert_eq!(
            verify(&raw, BOT_TOKEN, hour, ISSUED + 3601),
            InitDataVerdict::Expired
        );
    }

    #[test]
    fn test_signature_checked_before_expiry() {
        let raw = init_data_for(42, ISSUED, "other-token");
        assert_eq!(
            verify(&raw, BOT_TOKEN, Duration::ZERO, ISSUED + 1_000_000),
            InitDataVerdict::InvalidSignature
        );
    }

    #[test]
    fn test_without_user_is_valid_but_anonymous() {
        let raw = sign_init_data(&[(AUTH_DATE_FIELD, ISSUED.to_string())], BOT_TOKEN);
        let data = expect_valid(verify(&raw, BOT_TOKEN, DAY, ISSUED));
        assert!(data.user.is_none());
        assert!(data.identity().is_none());
    }

    #[test]
    fn test_plus_decodes_to_space_before_signing() {
        let raw = sign_init_data(
            &[
                (AUTH_DATE_FIELD, ISSUED.to_string()),
                (USER_FIELD, r#"{"id":7,"first_name":"Anna Maria"}"#.to_string()),
            ],
            BOT_TOKEN,
        );
        assert!(raw.contains("Anna+Maria"));
        let data = expect_valid(verify(&raw, BOT_TOKEN, DAY, ISSUED));
        assert_eq!(
            data.user.unwrap().first_name.as_deref(),
            Some("Anna Maria")
        );
    }

    #[test]
    fn test_malformed_inputs() {
        expect_malformed("");
        expect_malformed("&&&");
        expect_malformed("=value");
        expect_malformed("auth_date=1700000000&user=%7B%22id%22%3A1%7D");
        expect_malformed("hash=abcd&user=%7B%22id%22%3A1%7D");
        expect_malformed("hash=abcd&auth_date=yesterday");
        expect_malformed("hash=abcd&auth_date=1700000000&user=not-json");
        expect_malformed("hash=abcd&auth_date=1700000000&user=%7B%22name%22%3A%22x%22%7D");
        expect_malformed("hash=abcd&auth_date=1700000000&user=%7B%22id%22%3A%221%22%7D");
        expect_malformed("hash=abcd&auth_date=1&auth_date=2");
    }

    #[test]
    fn test_verdict_maps_to_errors() {
        use axum::http::StatusCode;

        let malformed = InitDataVerdict::Malformed("x".into()).into_result().unwrap_err();
        assert_eq!(malformed.status_code(), StatusCode::BAD_REQUEST);

        let forged = InitDataVerdict::InvalidSignature.into_result().unwrap_err();
        let stale = InitDataVerdict::Expired.into_result().unwrap_err();
        assert_eq!(forged.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(stale.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(forged.to_string(), stale.to_string());
    }

    #[test]
    fn test_debug_redacts_key() {
        let verifier = InitDataVerifier::new(BOT_TOKEN, DAY);
        assert!(format!("{verifier:?}").contains("REDACTED"));
    }
}
