mod chain;
mod health;
pub mod models;
mod nodes;
mod tx;

use actix_web::web::ServiceConfig;

pub use models::AppState;

pub fn init_routes(cfg: &mut ServiceConfig) {
    cfg.service(health::health_check)
        .service(chain::get_chain)
        .service(chain::mine_block)
        .service(chain::replace_chain)
        .service(chain::validate_chain)
        .service(tx::add_transaction)
        .service(nodes::connect_node);
}

#[cfg(test)]
mod tests {
    use super::{AppState, init_routes};
    use crate::blockchain::test_utils::{DIFF, mined_chain};
    use crate::blockchain::{Block, LinearSearch, ProofSearch, is_valid_chain};
    use crate::config::Settings;
    use crate::network::ChainFetcher;
    use crate::network::consensus::tests::StaticFetcher;
    use crate::transaction::Transaction;
    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};
    use serde_json::{Number, Value, json};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, OnceLock};

    fn state_with(fetcher: impl ChainFetcher + 'static) -> web::Data<AppState> {
        let settings = Settings {
            difficulty: DIFF,
            reward_receiver: "miner-wallet".into(),
            ..Settings::default()
        };
        web::Data::new(AppState::new(&settings, Arc::new(fetcher)))
    }

    fn state() -> web::Data<AppState> {
        state_with(StaticFetcher::default())
    }

    /// Proof search that lets another "miner" extend the chain first, so
    /// every proof it returns is for a tip that is already gone.
    #[derive(Default)]
    struct TipMover {
        state: OnceLock<web::Data<AppState>>,
        attempts: AtomicU32,
    }

    impl ProofSearch for TipMover {
        fn find_proof(&self, previous_proof: u64) -> Option<u64> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            let search = LinearSearch::new(DIFF);

            let state = self.state.get()?;
            let mut bc = state.blockchain.lock().unwrap();
            let tip = bc.tip().clone();
            let proof = search.find_proof(tip.proof)?;
            let mut chain = bc.chain().to_vec();
            chain.push(Block::new(
                tip.index + 1,
                tip.timestamp,
                vec![],
                proof,
                tip.hash.clone(),
            ));
            bc.replace(chain);
            drop(bc);

            search.find_proof(previous_proof)
        }
    }

    macro_rules! app {
        ($state:expr) => {
            test::init_service(App::new().app_data($state.clone()).configure(init_routes)).await
        };
    }

    #[actix_web::test]
    async fn health_is_up() {
        let state = state();
        let app = app!(state);
        let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn get_chain_starts_with_genesis() {
        let state = state();
        let app = app!(state);
        let body: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/get_chain").to_request(),
        )
        .await;

        assert_eq!(body["length"], 1);
        let genesis = &body["chain"][0];
        assert_eq!(genesis["index"], 1);
        assert_eq!(genesis["previous_hash"], "1");
        assert_eq!(genesis["proof"], 100);
        for field in ["timestamp", "transactions", "hash"] {
            assert!(genesis.get(field).is_some(), "missing {field}");
        }
    }

    #[actix_web::test]
    async fn add_transaction_then_mine() {
        let state = state();
        let app = app!(state);

        // Two blocks on top of genesis: chain length 3.
        for _ in 0..2 {
            let resp =
                test::call_service(&app, test::TestRequest::get().uri("/mine_block").to_request())
                    .await;
            assert_eq!(resp.status(), StatusCode::OK);
        }

        let req = test::TestRequest::post()
            .uri("/add_transaction")
            .set_json(json!({ "sender": "A", "receiver": "B", "amount": 10 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "This transaction will be added to Block 4");

        let mined: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/mine_block").to_request(),
        )
        .await;
        assert_eq!(mined["message"], "Congratulations, you just mined a block!");
        assert_eq!(mined["index"], 4);
        let txs = mined["transactions"].as_array().unwrap();
        assert_eq!(txs[0], json!({ "sender": "A", "receiver": "B", "amount": 10 }));
        // Mining reward follows the queued transactions.
        assert_eq!(txs[1]["sender"], state.node_id.as_str());
        assert_eq!(txs[1]["receiver"], "miner-wallet");
        assert_eq!(txs[1]["amount"], 1);
        for field in ["proof", "previous_hash", "timestamp"] {
            assert!(mined.get(field).is_some(), "missing {field}");
        }

        let bc = state.blockchain.lock().unwrap();
        assert_eq!(bc.len(), 4);
        assert!(bc.pending().is_empty());
        assert!(is_valid_chain(bc.chain(), DIFF));
        assert_eq!(mined["previous_hash"], bc.chain()[2].hash.as_str());
    }

    #[actix_web::test]
    async fn add_transaction_missing_amount_is_rejected() {
        let state = state();
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/add_transaction")
            .set_json(json!({ "sender": "A", "receiver": "B" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = test::read_body(resp).await;
        assert_eq!(body, "Missing values");

        assert!(state.blockchain.lock().unwrap().pending().is_empty());
    }

    #[actix_web::test]
    async fn connect_node_registers_and_dedups() {
        let state = state();
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/connect_node")
            .set_json(json!({ "nodes": [
                "http://127.0.0.1:5001",
                "127.0.0.1:5001",
                "http://127.0.0.1:5002/"
            ]}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "All nodes are now connected");
        let mut nodes: Vec<String> = serde_json::from_value(body["total_nodes"].clone()).unwrap();
        nodes.sort();
        assert_eq!(nodes, vec!["127.0.0.1:5001", "127.0.0.1:5002"]);
    }

    #[actix_web::test]
    async fn connect_node_without_nodes_is_rejected() {
        let state = state();
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/connect_node")
            .set_json(json!({ "peers": ["127.0.0.1:5001"] }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/connect_node")
            .set_json(json!({ "nodes": ["127.0.0.1:5001", "/no-host"] }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(state.nodes.lock().unwrap().len(), 0);
    }

    #[actix_web::test]
    async fn replace_chain_adopts_longer_peer_chain() {
        let remote = mined_chain(5);
        let state = state_with(StaticFetcher::default().with("10.0.0.5:5000", remote.clone()));
        let app = app!(state);

        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/mine_block").to_request())
                .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::post()
            .uri("/connect_node")
            .set_json(json!({ "nodes": ["10.0.0.5:5000"] }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

        let body: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/replace_chain").to_request(),
        )
        .await;
        assert_eq!(
            body["message"],
            "The chain has been replaced by the longest chain"
        );
        let chain: Vec<Block> = serde_json::from_value(body["chain"].clone()).unwrap();
        assert_eq!(chain, remote);
        assert_eq!(state.blockchain.lock().unwrap().chain(), remote.as_slice());
    }

    #[actix_web::test]
    async fn replace_chain_keeps_local_when_longest() {
        let state = state_with(StaticFetcher::default().with("10.0.0.5:5000", mined_chain(2)));
        let app = app!(state);

        for _ in 0..2 {
            test::call_service(&app, test::TestRequest::get().uri("/mine_block").to_request())
                .await;
        }
        state
            .nodes
            .lock()
            .unwrap()
            .register("10.0.0.5:5000")
            .unwrap();
        let before = state.blockchain.lock().unwrap().chain().to_vec();

        let body: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/replace_chain").to_request(),
        )
        .await;
        assert_eq!(
            body["message"],
            "Our chain is the largest or equal to the longest chain"
        );
        assert_eq!(state.blockchain.lock().unwrap().chain(), before.as_slice());
    }

    #[actix_web::test]
    async fn validate_chain_reports_local_state() {
        let state = state();
        let app = app!(state);
        test::call_service(&app, test::TestRequest::get().uri("/mine_block").to_request()).await;

        let body: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/validate_chain").to_request(),
        )
        .await;
        assert_eq!(body["valid"], true);
        assert_eq!(body["length"], 2);
    }

    #[actix_web::test]
    async fn mine_block_reports_exhausted_budget() {
        let settings = Settings {
            difficulty: 6,
            mining_max_attempts: Some(1),
            ..Settings::default()
        };
        // 100 -> 1 hashes to "5632..", so a one-candidate budget never hits six zeros.
        let state = web::Data::new(AppState::new(&settings, Arc::new(StaticFetcher::default())));
        let app = app!(state);

        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/mine_block").to_request())
                .await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(state.blockchain.lock().unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn mine_block_gives_up_when_tip_keeps_moving() {
        let settings = Settings {
            difficulty: DIFF,
            ..Settings::default()
        };
        let mover = Arc::new(TipMover::default());
        let mut app_state = AppState::new(&settings, Arc::new(StaticFetcher::default()));
        app_state.miner = mover.clone();
        let state = web::Data::new(app_state);
        let _ = mover.state.set(state.clone());
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/add_transaction")
            .set_json(json!({ "sender": "A", "receiver": "B", "amount": 10 }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/mine_block").to_request())
                .await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        assert_eq!(mover.attempts.load(Ordering::SeqCst), state.mine_retry_limit);
        assert_eq!(state.mine_retry_limit, 3);

        let bc = state.blockchain.lock().unwrap();
        // Only the competing blocks landed; our transaction is still queued, no reward.
        assert_eq!(bc.len(), 1 + 3);
        assert_eq!(bc.pending(), &[Transaction::new("A", "B", Number::from(10u64))]);
        assert!(is_valid_chain(bc.chain(), DIFF));
    }
}
