//! Integration tests for mosaic-wallet
//!
//! These tests drive the command flows end to end:
//! - Wallet creation, persistence and re-opening
//! - Balance reporting and its failure handling
//! - Transfer validation, confirmation and submission
//! - The bundled NEM ledger against a local JSON-RPC gateway

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use mosaic_wallet::{
    commands::{balance, create, send},
    config::{MosaicSettings, Network},
    keys::{AccountKeys, Address},
    keystore::WalletBlob,
    ledger::{
        AnnounceResult, Balances, Ledger, TransferPreview, TransferRequest, UnlockedAccount,
    },
    prompt::Prompter,
    storage::WalletStore,
    NisLedger, WalletError,
};
use std::collections::VecDeque;
use std::sync::Mutex;
use tempfile::TempDir;
use zeroize::Zeroizing;

const TEST_PASSWORD: &str = "secure-test-password-123!";

// ============================================================================
// Test doubles
// ============================================================================

/// Replays scripted answers in order
#[derive(Default)]
struct ScriptedPrompter {
    passwords: VecDeque<String>,
    lines: VecDeque<String>,
}

impl ScriptedPrompter {
    fn new(passwords: &[&str], lines: &[&str]) -> Self {
        Self {
            passwords: passwords.iter().map(|s| s.to_string()).collect(),
            lines: lines.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn password(&mut self, prompt: &str) -> Result<Zeroizing<String>> {
        self.passwords
            .pop_front()
            .map(Zeroizing::new)
            .ok_or_else(|| anyhow!("unexpected password prompt: {}", prompt))
    }

    fn line(&mut self, prompt: &str) -> Result<String> {
        self.lines
            .pop_front()
            .ok_or_else(|| anyhow!("unexpected prompt: {}", prompt))
    }
}

/// In-memory ledger recording every call.
///
/// Wallet blobs are `password:private_key_hex`, which keeps the tests fast.
struct FakeLedger {
    balances: Option<Balances>,
    fee: Option<u64>,
    announce: Option<AnnounceResult>,
    calls: Mutex<Vec<String>>,
    sent: Mutex<Vec<TransferRequest>>,
}

impl FakeLedger {
    fn with_mosaic_balance(mosaic: u64) -> Self {
        Self {
            balances: Some(Balances {
                xem: 2_000_000,
                mosaic,
            }),
            fee: Some(150_000),
            announce: Some(AnnounceResult {
                code: 1,
                kind: 1,
                message: "SUCCESS".to_string(),
                transaction_hash: Some("abcd".to_string()),
            }),
            calls: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
        }
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }
}

#[async_trait]
impl Ledger for FakeLedger {
    fn create_wallet(&self, _name: &str, password: &str) -> Result<WalletBlob> {
        self.record("create_wallet");
        let keys = AccountKeys::generate(Network::Mainnet);
        Ok(WalletBlob::from_bytes(
            format!("{}:{}", password, keys.private_key_hex().as_str()).into_bytes(),
        ))
    }

    fn open_wallet(
        &self,
        blob: &WalletBlob,
        password: &str,
    ) -> Result<UnlockedAccount, WalletError> {
        self.record("open_wallet");
        let text = String::from_utf8(blob.as_bytes().to_vec())
            .map_err(|e| WalletError::Decryption(e.to_string()))?;
        let (stored, key_hex) = text
            .rsplit_once(':')
            .ok_or_else(|| WalletError::Decryption("corrupt wallet".to_string()))?;
        if stored != password {
            return Err(WalletError::Decryption(
                "Decryption failed - wrong password?".to_string(),
            ));
        }
        let key = hex::decode(key_hex).map_err(|e| WalletError::Decryption(e.to_string()))?;
        let keys = AccountKeys::from_private_key(&key, Network::Mainnet)
            .map_err(|e| WalletError::Decryption(e.to_string()))?;
        Ok(UnlockedAccount::new(keys))
    }

    async fn balances(&self, _address: &Address) -> Result<Balances> {
        self.record("balances");
        self.balances.ok_or_else(|| anyhow!("connection refused"))
    }

    async fn prepare_transfer(
        &self,
        _request: &TransferRequest,
        _account: &UnlockedAccount,
    ) -> Result<TransferPreview> {
        self.record("prepare_transfer");
        self.fee
            .map(|fee| TransferPreview {
                fee,
                data: "c0ffee".to_string(),
            })
            .ok_or_else(|| anyhow!("gateway unavailable"))
    }

    async fn send_mosaic(
        &self,
        request: &TransferRequest,
        _preview: &TransferPreview,
        _account: &UnlockedAccount,
    ) -> Result<AnnounceResult> {
        self.record("send_mosaic");
        self.sent.lock().unwrap().push(request.clone());
        self.announce
            .clone()
            .ok_or_else(|| anyhow!("announce failed"))
    }
}

fn settings(temp_dir: &TempDir) -> MosaicSettings {
    MosaicSettings {
        mosaic_name: "acme".to_string(),
        namespace: "acmecorp".to_string(),
        wallets_dir: Some(temp_dir.path().join("acme-wallets")),
        ..MosaicSettings::default()
    }
}

fn store(settings: &MosaicSettings) -> WalletStore {
    WalletStore::from_settings(settings).unwrap()
}

/// Save a wallet through the ledger and return its address
fn seed_wallet(store: &WalletStore, ledger: &dyn Ledger) -> Address {
    let blob = ledger.create_wallet("acme", TEST_PASSWORD).unwrap();
    store.save(&blob).unwrap();
    ledger.open_wallet(&blob, TEST_PASSWORD).unwrap().address()
}

fn wallet_files(store: &WalletStore) -> usize {
    std::fs::read_dir(store.dir()).unwrap().count()
}

fn wallet_error(err: &anyhow::Error) -> &WalletError {
    err.downcast_ref::<WalletError>()
        .expect("expected a WalletError")
}

// ============================================================================
// Wallet Creation Tests
// ============================================================================

mod wallet_creation {
    use super::*;

    #[test]
    fn test_created_wallet_reopens_with_same_password() {
        let temp_dir = TempDir::new().unwrap();
        let settings = settings(&temp_dir);
        let store = store(&settings);
        let ledger = NisLedger::new(&settings).unwrap();
        let mut prompter = ScriptedPrompter::new(&[TEST_PASSWORD, TEST_PASSWORD], &[]);

        let created = create::run(&settings, &store, &ledger, &mut prompter).unwrap();

        assert_eq!(created.path, store.default_path());
        let blob = store.load().unwrap();
        let account = ledger.open_wallet(&blob, TEST_PASSWORD).unwrap();
        assert_eq!(account.address(), created.address);
        assert!(ledger.open_wallet(&blob, "another-password").is_err());
    }

    #[test]
    fn test_mismatched_passwords_reprompt() {
        let temp_dir = TempDir::new().unwrap();
        let settings = settings(&temp_dir);
        let store = store(&settings);
        let ledger = FakeLedger::with_mosaic_balance(0);
        let mut prompter = ScriptedPrompter::new(
            &[
                "password-one",
                "password-two",
                "password-three",
                "password-four",
                TEST_PASSWORD,
                TEST_PASSWORD,
            ],
            &[],
        );

        create::run(&settings, &store, &ledger, &mut prompter).unwrap();

        assert!(prompter.passwords.is_empty());
        assert_eq!(ledger.count("create_wallet"), 1);
        assert_eq!(wallet_files(&store), 1);

        let blob = store.load().unwrap();
        assert!(ledger.open_wallet(&blob, TEST_PASSWORD).is_ok());
    }

    #[test]
    fn test_short_password_reprompts() {
        let temp_dir = TempDir::new().unwrap();
        let settings = settings(&temp_dir);
        let store = store(&settings);
        let ledger = FakeLedger::with_mosaic_balance(0);
        let mut prompter = ScriptedPrompter::new(&["short", TEST_PASSWORD, TEST_PASSWORD], &[]);

        create::run(&settings, &store, &ledger, &mut prompter).unwrap();

        assert!(prompter.passwords.is_empty());
        assert_eq!(ledger.count("create_wallet"), 1);
    }

    #[test]
    fn test_bounded_attempts_persist_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let mut settings = settings(&temp_dir);
        settings.max_password_attempts = Some(2);
        let store = store(&settings);
        let ledger = FakeLedger::with_mosaic_balance(0);
        let mut prompter = ScriptedPrompter::new(
            &["aaaaaaaa", "bbbbbbbb", "cccccccc", "dddddddd", TEST_PASSWORD, TEST_PASSWORD],
            &[],
        );

        let err = create::run(&settings, &store, &ledger, &mut prompter).unwrap_err();

        assert!(matches!(wallet_error(&err), WalletError::TooManyAttempts(2)));
        assert_eq!(ledger.count("create_wallet"), 0);
        assert!(!store.exists());
    }

    #[test]
    fn test_second_wallet_keeps_first_intact() {
        let temp_dir = TempDir::new().unwrap();
        let settings = settings(&temp_dir);
        let store = store(&settings);
        let ledger = FakeLedger::with_mosaic_balance(0);

        let mut prompter = ScriptedPrompter::new(&[TEST_PASSWORD, TEST_PASSWORD], &[]);
        let first = create::run(&settings, &store, &ledger, &mut prompter).unwrap();
        let original = std::fs::read(&first.path).unwrap();

        let mut prompter = ScriptedPrompter::new(&[TEST_PASSWORD, TEST_PASSWORD], &[]);
        let second = create::run(&settings, &store, &ledger, &mut prompter).unwrap();

        assert_ne!(first.path, second.path);
        assert_ne!(first.address, second.address);
        assert_eq!(std::fs::read(&first.path).unwrap(), original);
        assert_eq!(wallet_files(&store), 2);
    }
}

// ============================================================================
// Balance Reporting Tests
// ============================================================================

mod balance_report {
    use super::*;

    #[tokio::test]
    async fn test_report_returns_mosaic_balance() {
        let temp_dir = TempDir::new().unwrap();
        let settings = settings(&temp_dir);
        let ledger = FakeLedger::with_mosaic_balance(5_000_000);
        let account = UnlockedAccount::new(AccountKeys::generate(Network::Mainnet));

        let balance = balance::report(&settings, &ledger, &account).await;

        assert_eq!(balance, Some(5_000_000));
        assert_eq!(ledger.calls(), vec!["balances"]);
    }

    #[tokio::test]
    async fn test_report_survives_ledger_failure() {
        let temp_dir = TempDir::new().unwrap();
        let settings = settings(&temp_dir);
        let mut ledger = FakeLedger::with_mosaic_balance(0);
        ledger.balances = None;
        let account = UnlockedAccount::new(AccountKeys::generate(Network::Mainnet));

        assert_eq!(balance::report(&settings, &ledger, &account).await, None);
    }

    #[tokio::test]
    async fn test_balance_command() {
        let temp_dir = TempDir::new().unwrap();
        let settings = settings(&temp_dir);
        let store = store(&settings);
        let ledger = FakeLedger::with_mosaic_balance(1_250_000);
        seed_wallet(&store, &ledger);
        let mut prompter = ScriptedPrompter::new(&[TEST_PASSWORD], &[]);

        balance::run(&settings, &store, &ledger, &mut prompter)
            .await
            .unwrap();

        assert_eq!(ledger.count("balances"), 1);
    }

    #[tokio::test]
    async fn test_wrong_password_aborts_quietly() {
        let temp_dir = TempDir::new().unwrap();
        let settings = settings(&temp_dir);
        let store = store(&settings);
        let ledger = FakeLedger::with_mosaic_balance(1_250_000);
        seed_wallet(&store, &ledger);
        let mut prompter = ScriptedPrompter::new(&["not-the-password"], &[]);

        balance::run(&settings, &store, &ledger, &mut prompter)
            .await
            .unwrap();

        assert_eq!(ledger.count("balances"), 0);
    }

    #[test]
    fn test_missing_wallet_is_located() {
        let temp_dir = TempDir::new().unwrap();
        let settings = settings(&temp_dir);
        let store = store(&settings);

        let err = store.require_existing().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("acme-wallet.wlt"));
        assert!(msg.contains(&store.default_path().display().to_string()));
    }
}

// ============================================================================
// Transfer Flow Tests
// ============================================================================

mod transfer_flow {
    use super::*;

    async fn send_with(
        ledger: &FakeLedger,
        amount: Option<&str>,
        recipient: Option<&str>,
        answers: &[&str],
    ) -> Result<()> {
        let temp_dir = TempDir::new().unwrap();
        let settings = settings(&temp_dir);
        let store = store(&settings);
        seed_wallet(&store, ledger);
        let mut prompter = ScriptedPrompter::new(&[TEST_PASSWORD], answers);

        send::run(&settings, &store, ledger, &mut prompter, amount, recipient).await
    }

    #[tokio::test]
    async fn test_invalid_amount_never_previews() {
        for amount in ["abc", "NaN", "", "1e5", "-3"] {
            let ledger = FakeLedger::with_mosaic_balance(5_000_000);
            let err = send_with(&ledger, Some(amount), Some("N-ADDR-1"), &[])
                .await
                .unwrap_err();

            assert!(matches!(wallet_error(&err), WalletError::InvalidAmount));
            assert_eq!(ledger.count("prepare_transfer"), 0, "amount {:?}", amount);
        }
    }

    #[tokio::test]
    async fn test_insufficient_balance_never_previews() {
        let ledger = FakeLedger::with_mosaic_balance(5_000_000);

        let err = send_with(&ledger, Some("10.356784"), Some("N-ADDR-1"), &[])
            .await
            .unwrap_err();

        assert!(matches!(
            wallet_error(&err),
            WalletError::InsufficientBalance { .. }
        ));
        assert_eq!(ledger.calls(), vec!["create_wallet", "open_wallet", "open_wallet", "balances"]);
    }

    #[tokio::test]
    async fn test_missing_recipient() {
        let ledger = FakeLedger::with_mosaic_balance(5_000_000);

        let err = send_with(&ledger, Some("1"), None, &[]).await.unwrap_err();

        assert!(matches!(wallet_error(&err), WalletError::MissingRecipient));
        assert_eq!(ledger.count("prepare_transfer"), 0);
    }

    #[tokio::test]
    async fn test_refused_confirmation_cancels() {
        for answer in ["", "n", "no", "yep", "nope", "ok"] {
            let ledger = FakeLedger::with_mosaic_balance(5_000_000);

            let err = send_with(&ledger, Some("1.5"), Some("N-ADDR-1"), &[answer])
                .await
                .unwrap_err();

            assert!(matches!(wallet_error(&err), WalletError::Cancelled));
            assert_eq!(ledger.count("prepare_transfer"), 1);
            assert_eq!(ledger.count("send_mosaic"), 0, "answer {:?}", answer);
        }
    }

    #[tokio::test]
    async fn test_confirmed_transfer_is_submitted() {
        for answer in ["y", "Y", "yes", "YES"] {
            let ledger = FakeLedger::with_mosaic_balance(5_000_000);

            send_with(&ledger, Some("1.5"), Some("N-ADDR-1"), &[answer])
                .await
                .unwrap();

            let sent = ledger.sent.lock().unwrap().clone();
            assert_eq!(
                sent,
                vec![TransferRequest {
                    amount: 1_500_000,
                    recipient: "N-ADDR-1".to_string(),
                }]
            );
        }
    }

    #[tokio::test]
    async fn test_submission_failure_is_not_fatal() {
        let mut ledger = FakeLedger::with_mosaic_balance(5_000_000);
        ledger.announce = None;

        send_with(&ledger, Some("1"), Some("N-ADDR-1"), &["y"])
            .await
            .unwrap();

        assert_eq!(ledger.count("send_mosaic"), 1);
    }

    #[tokio::test]
    async fn test_preview_failure_stops_before_prompt() {
        let mut ledger = FakeLedger::with_mosaic_balance(5_000_000);
        ledger.fee = None;

        // No confirmation answer is scripted: prompting would fail the test.
        send_with(&ledger, Some("1"), Some("N-ADDR-1"), &[])
            .await
            .unwrap();

        assert_eq!(ledger.count("send_mosaic"), 0);
    }

    #[tokio::test]
    async fn test_wrong_password_sends_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let settings = settings(&temp_dir);
        let store = store(&settings);
        let ledger = FakeLedger::with_mosaic_balance(5_000_000);
        seed_wallet(&store, &ledger);
        let mut prompter = ScriptedPrompter::new(&["wrong-password"], &["y"]);

        send::run(
            &settings,
            &store,
            &ledger,
            &mut prompter,
            Some("1"),
            Some("N-ADDR-1"),
        )
        .await
        .unwrap();

        assert_eq!(ledger.count("balances"), 0);
        assert_eq!(ledger.count("send_mosaic"), 0);
    }
}

// ============================================================================
// Gateway Tests
// ============================================================================

mod gateway {
    use super::*;
    use ed25519_dalek::{Signature, Verifier, VerifyingKey};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    type Recorded = Arc<Mutex<Vec<Value>>>;

    /// Serve canned JSON-RPC results keyed by method name.
    ///
    /// Results for the same method are served in order; the last one repeats.
    async fn spawn_gateway(results: Vec<(&'static str, Value)>) -> (String, Recorded) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let recorded: Recorded = Arc::new(Mutex::new(Vec::new()));

        let seen = recorded.clone();
        let mut results = results;
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    return;
                };
                let request = match read_request(stream).await {
                    Some(request) => request,
                    None => continue,
                };
                let (mut stream, body) = request;
                let method = body["method"].as_str().unwrap_or_default().to_string();
                seen.lock().unwrap().push(body.clone());

                let position = results.iter().position(|(m, _)| *m == method);
                let canned = position.map(|idx| {
                    let repeats = results[idx + 1..].iter().any(|(m, _)| *m == method);
                    if repeats {
                        results.remove(idx).1
                    } else {
                        results[idx].1.clone()
                    }
                });

                let result = canned
                    .map(|r| json!({ "jsonrpc": "2.0", "id": body["id"], "result": r }))
                    .unwrap_or_else(|| {
                        json!({
                            "jsonrpc": "2.0",
                            "id": body["id"],
                            "error": { "code": -32601, "message": "method not found" }
                        })
                    });

                let payload = result.to_string();
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    payload.len(),
                    payload
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        (url, recorded)
    }

    async fn read_request(mut stream: TcpStream) -> Option<(TcpStream, Value)> {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = stream.read(&mut chunk).await.ok()?;
            if n == 0 {
                return None;
            }
            buf.extend_from_slice(&chunk[..n]);

            let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
                continue;
            };
            let headers = String::from_utf8_lossy(&buf[..end]).to_lowercase();
            let length = headers
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);

            let body_start = end + 4;
            if buf.len() >= body_start + length {
                let body = serde_json::from_slice(&buf[body_start..body_start + length]).ok()?;
                return Some((stream, body));
            }
        }
    }

    fn gateway_settings(temp_dir: &TempDir, endpoints: Vec<String>) -> MosaicSettings {
        MosaicSettings {
            endpoints,
            ..settings(temp_dir)
        }
    }

    #[tokio::test]
    async fn test_balances_pick_xem_and_mosaic() {
        let (url, recorded) = spawn_gateway(vec![(
            "account_getMosaicsOwned",
            json!({ "data": [
                { "mosaicId": { "namespaceId": "nem", "name": "xem" }, "quantity": 4_000_000 },
                { "mosaicId": { "namespaceId": "acmecorp", "name": "acme" }, "quantity": 12_500_000 },
                { "mosaicId": { "namespaceId": "other", "name": "acme" }, "quantity": 1 }
            ]}),
        )])
        .await;

        let temp_dir = TempDir::new().unwrap();
        let ledger = NisLedger::new(&gateway_settings(&temp_dir, vec![url])).unwrap();
        let account = UnlockedAccount::new(AccountKeys::generate(Network::Mainnet));

        let balances = ledger.balances(&account.address()).await.unwrap();

        assert_eq!(
            balances,
            Balances {
                xem: 4_000_000,
                mosaic: 12_500_000
            }
        );
        let requests = recorded.lock().unwrap();
        assert_eq!(requests[0]["params"]["address"], account.address().plain());
    }

    #[tokio::test]
    async fn test_failover_to_second_endpoint() {
        let (url, _recorded) = spawn_gateway(vec![(
            "account_getMosaicsOwned",
            json!({ "data": [] }),
        )])
        .await;

        // Grab a free port and close it so the first endpoint refuses.
        let dead = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let dead_url = format!("http://{}", dead.local_addr().unwrap());
        drop(dead);

        let temp_dir = TempDir::new().unwrap();
        let ledger = NisLedger::new(&gateway_settings(&temp_dir, vec![dead_url, url])).unwrap();
        let account = UnlockedAccount::new(AccountKeys::generate(Network::Mainnet));

        let balances = ledger.balances(&account.address()).await.unwrap();
        assert_eq!(balances, Balances::default());
    }

    fn transfer_request() -> TransferRequest {
        TransferRequest {
            amount: 1_500_000,
            recipient: "N-ADDR-1".to_string(),
        }
    }

    fn announce_success() -> (&'static str, Value) {
        (
            "transaction_announce",
            json!({ "code": 1, "type": 1, "message": "SUCCESS", "transactionHash": "ff00" }),
        )
    }

    #[tokio::test]
    async fn test_preview_and_signed_announce() {
        let (url, recorded) = spawn_gateway(vec![
            ("transfer_prepare", json!({ "fee": 150_000, "data": "deadbeef" })),
            announce_success(),
        ])
        .await;

        let temp_dir = TempDir::new().unwrap();
        let ledger = NisLedger::new(&gateway_settings(&temp_dir, vec![url])).unwrap();
        let keys = AccountKeys::generate(Network::Mainnet);
        let public_key = keys.public_key_bytes();
        let account = UnlockedAccount::new(keys);
        let request = transfer_request();

        let preview = ledger.prepare_transfer(&request, &account).await.unwrap();
        assert_eq!(preview.fee, 150_000);

        let result = ledger.send_mosaic(&request, &preview, &account).await.unwrap();
        assert!(result.is_success());
        assert_eq!(result.transaction_hash.as_deref(), Some("ff00"));

        let requests = recorded.lock().unwrap();
        let methods: Vec<_> = requests.iter().map(|r| r["method"].clone()).collect();
        assert_eq!(methods, vec!["transfer_prepare", "transaction_announce"]);

        assert_eq!(requests[0]["params"]["signer"], account.public_key_hex());
        assert_eq!(requests[0]["params"]["recipient"], "N-ADDR-1");
        assert_eq!(requests[0]["params"]["quantity"], 1_500_000);
        assert_eq!(
            requests[0]["params"]["mosaic"],
            json!({ "namespaceId": "acmecorp", "name": "acme" })
        );

        assert_eq!(requests[1]["params"]["data"], "deadbeef");
        let signature = hex::decode(requests[1]["params"]["signature"].as_str().unwrap()).unwrap();
        let signature = Signature::from_slice(&signature).unwrap();
        let verifying = VerifyingKey::from_bytes(&public_key).unwrap();
        assert!(verifying
            .verify(&[0xde, 0xad, 0xbe, 0xef], &signature)
            .is_ok());
    }

    #[tokio::test]
    async fn test_confirmed_transfer_announces_previewed_fee() {
        // A second build of the transfer would cost 50 XEM.
        let (url, recorded) = spawn_gateway(vec![
            ("transfer_prepare", json!({ "fee": 150_000, "data": "deadbeef" })),
            ("transfer_prepare", json!({ "fee": 50_000_000, "data": "0badf00d" })),
            announce_success(),
        ])
        .await;

        let temp_dir = TempDir::new().unwrap();
        let settings = gateway_settings(&temp_dir, vec![url]);
        let ledger = NisLedger::new(&settings).unwrap();
        let account = UnlockedAccount::new(AccountKeys::generate(Network::Mainnet));
        let mut prompter = ScriptedPrompter::new(&[], &["y"]);

        send::transfer(&settings, &ledger, &mut prompter, &account, &transfer_request())
            .await
            .unwrap();

        let requests = recorded.lock().unwrap();
        let methods: Vec<_> = requests.iter().map(|r| r["method"].clone()).collect();
        assert_eq!(methods, vec!["transfer_prepare", "transaction_announce"]);
        assert_eq!(requests[1]["params"]["data"], "deadbeef");
    }

    #[tokio::test]
    async fn test_refused_transfer_announces_nothing() {
        let (url, recorded) = spawn_gateway(vec![
            ("transfer_prepare", json!({ "fee": 150_000, "data": "deadbeef" })),
            announce_success(),
        ])
        .await;

        let temp_dir = TempDir::new().unwrap();
        let settings = gateway_settings(&temp_dir, vec![url]);
        let ledger = NisLedger::new(&settings).unwrap();
        let account = UnlockedAccount::new(AccountKeys::generate(Network::Mainnet));
        let mut prompter = ScriptedPrompter::new(&[], &["n"]);

        let err = send::transfer(&settings, &ledger, &mut prompter, &account, &transfer_request())
            .await
            .unwrap_err();

        assert!(matches!(wallet_error(&err), WalletError::Cancelled));
        let requests = recorded.lock().unwrap();
        assert!(requests.iter().all(|r| r["method"] != "transaction_announce"));
    }

    #[tokio::test]
    async fn test_rpc_error_is_reported() {
        let (url, _recorded) = spawn_gateway(vec![]).await;

        let temp_dir = TempDir::new().unwrap();
        let ledger = NisLedger::new(&gateway_settings(&temp_dir, vec![url])).unwrap();
        let account = UnlockedAccount::new(AccountKeys::generate(Network::Mainnet));

        let err = ledger
            .prepare_transfer(&transfer_request(), &account)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("method not found"));
    }
}
