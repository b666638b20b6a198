//! Custom checks that resolve after `evaluate` returns.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use wsverify_core::{AdmissionConfig, AdmissionDecision, AdmissionPipeline, RequestDescriptor};

fn pipeline(cfg: AdmissionConfig) -> AdmissionPipeline {
    AdmissionPipeline::new(Some(cfg)).unwrap()
}

#[tokio::test]
async fn resolves_from_spawned_task() {
    let cfg = AdmissionConfig::builder()
        .check(|req, r| {
            let user = req.header("x-user").unwrap_or_default().to_string();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(10)).await;
                if user == "alice" {
                    r.admit();
                } else {
                    r.reject(401, Some("unknown user"));
                }
            });
            None
        })
        .build()
        .unwrap();
    let p = pipeline(cfg);

    let (tx, rx) = oneshot::channel();
    p.evaluate(
        RequestDescriptor::default().with_header("x-user", "alice"),
        move |d| {
            let _ = tx.send(d);
        },
    );
    assert_eq!(rx.await.unwrap(), AdmissionDecision::Admit);

    let (tx, rx) = oneshot::channel();
    p.evaluate(
        RequestDescriptor::default().with_header("x-user", "mallory"),
        move |d| {
            let _ = tx.send(d);
        },
    );
    assert_eq!(
        rx.await.unwrap(),
        AdmissionDecision::Reject {
            status: 401,
            message: Some("unknown user".into())
        }
    );
}

#[tokio::test]
async fn sync_return_beats_later_continuation() {
    let late_result = Arc::new(AtomicUsize::new(0));
    let late = late_result.clone();
    let cfg = AdmissionConfig::builder()
        .check(move |_, r| {
            let late = late.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(5)).await;
                // 1 = late call was ignored
                let took = r.admit();
                late.store(if took { 2 } else { 1 }, Ordering::SeqCst);
            });
            Some(false)
        })
        .build()
        .unwrap();

    let calls = Arc::new(AtomicUsize::new(0));
    let (tx, rx) = oneshot::channel();
    let c = calls.clone();
    pipeline(cfg).evaluate(RequestDescriptor::default(), move |d| {
        c.fetch_add(1, Ordering::SeqCst);
        let _ = tx.send(d);
    });

    assert_eq!(
        rx.await.unwrap(),
        AdmissionDecision::Reject {
            status: 400,
            message: None
        }
    );
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(late_result.load(Ordering::SeqCst), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn dropped_responder_never_resolves() {
    let cfg = AdmissionConfig::builder()
        .check(|_, r| {
            drop(r);
            None
        })
        .build()
        .unwrap();

    let (tx, rx) = oneshot::channel::<AdmissionDecision>();
    pipeline(cfg).evaluate(RequestDescriptor::default(), move |d| {
        let _ = tx.send(d);
    });
    // sender dropped together with the responder
    assert!(rx.await.is_err());
}
