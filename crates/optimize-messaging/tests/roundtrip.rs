use std::sync::Arc;

use optimize_application::{PropositionService, PropositionStore};
use optimize_core::config::OptimizeConfig;
use optimize_core::proposition::{DecisionScope, Offer, OfferType, Proposition};
use optimize_messaging::{EventHub, Responder, TracingReporter};
use serde_json::Map;
use tokio::sync::oneshot;

fn wiring() -> (
    Arc<PropositionService>,
    Arc<PropositionStore>,
    tokio::sync::mpsc::Receiver<optimize_core::proposition::PersonalizationRequest>,
    Responder,
) {
    let config = OptimizeConfig::default();
    let (hub, requests) = EventHub::from_config(&config);
    let (responder, responses) = Responder::channel(config.channel_capacity);

    let store = Arc::new(PropositionStore::new());
    let service = Arc::new(PropositionService::new(
        store.clone(),
        Arc::new(hub),
        Arc::new(TracingReporter),
    ));
    tokio::spawn(service.clone().run_response_loop(responses));

    (service, store, requests, responder)
}

#[tokio::test]
async fn update_round_trip_populates_store() {
    let (service, store, mut requests, responder) = wiring();

    let (sender, receiver) = oneshot::channel();
    service
        .update_propositions_with(
            vec![DecisionScope::new("mbox1")],
            Map::new(),
            Map::new(),
            sender,
        )
        .await
        .unwrap();

    // Play the decisioning service: drain the request, answer it.
    let request = requests.recv().await.unwrap();
    let proposition = Proposition::new(
        request.scopes[0].clone(),
        vec![Offer::new("offer-1", "Hello", OfferType::Text)],
    );
    responder
        .propositions(request.request_id, vec![proposition.clone()])
        .await
        .unwrap();

    let delivered = receiver.await.unwrap().unwrap();
    assert_eq!(delivered, vec![proposition.clone()]);

    let cached = store.get("mbox1").await.unwrap();
    assert_eq!(cached, proposition);
    assert_eq!(cached.offers[0].scope_name, "mbox1");
}

#[tokio::test]
async fn timeout_failure_classifies_and_keeps_cache() {
    let (service, store, mut requests, responder) = wiring();

    // Seed the cache through a first successful round trip.
    let (sender, receiver) = oneshot::channel();
    service
        .update_propositions_with(
            vec![DecisionScope::new("mbox1")],
            Map::new(),
            Map::new(),
            sender,
        )
        .await
        .unwrap();
    let first = requests.recv().await.unwrap();
    responder
        .propositions(
            first.request_id,
            vec![Proposition::new(
                first.scopes[0].clone(),
                vec![Offer::new("offer-1", "Hello", OfferType::Text)],
            )],
        )
        .await
        .unwrap();
    receiver.await.unwrap().unwrap();

    // Second request times out on the channel side.
    let (sender, receiver) = oneshot::channel();
    service
        .update_propositions_with(
            vec![DecisionScope::new("mbox1")],
            Map::new(),
            Map::new(),
            sender,
        )
        .await
        .unwrap();
    let second = requests.recv().await.unwrap();
    responder.fail_timeout(second.request_id).await.unwrap();

    let error = receiver.await.unwrap().unwrap_err();
    assert!(error.is_timeout());
    assert_eq!(error.status, Some(408));

    // The earlier proposition survives the failure.
    assert!(store.get("mbox1").await.is_some());
}

#[tokio::test]
async fn snapshot_is_sorted_across_round_trips() {
    let (service, _store, mut requests, responder) = wiring();

    for scope in ["b", "a", "c"] {
        let (sender, receiver) = oneshot::channel();
        service
            .update_propositions_with(
                vec![DecisionScope::new(scope)],
                Map::new(),
                Map::new(),
                sender,
            )
            .await
            .unwrap();
        let request = requests.recv().await.unwrap();
        responder
            .propositions(
                request.request_id,
                vec![Proposition::new(request.scopes[0].clone(), Vec::new())],
            )
            .await
            .unwrap();
        receiver.await.unwrap().unwrap();
    }

    let names: Vec<String> = service
        .snapshot()
        .await
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    assert_eq!(names, ["a", "b", "c"]);
}

#[tokio::test]
async fn fire_and_forget_update_still_populates_store() {
    let (service, store, mut requests, responder) = wiring();

    service
        .update_propositions(vec![DecisionScope::new("mbox1")], Map::new(), Map::new())
        .await
        .unwrap();

    let request = requests.recv().await.unwrap();
    responder
        .propositions(
            request.request_id,
            vec![Proposition::new(request.scopes[0].clone(), Vec::new())],
        )
        .await
        .unwrap();

    // No callback to await: poll the store until the response loop lands it.
    for _ in 0..50 {
        if store.get("mbox1").await.is_some() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("proposition never reached the store");
}
