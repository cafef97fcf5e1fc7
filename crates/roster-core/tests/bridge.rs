use std::sync::mpsc;
use std::thread;

use roster_core::store::RecordStore;
use roster_core::{
    Bridge, DialogHost, MemoryStore, NullDialogHost, Outbound, Request, Response,
};

const ADA_KEY: &str = "11111111-1111-1111-1111-111111111111";
const ADA_RECORD: &str = r#"{"demographics":{"name":"Ada"}}"#;

/// Dialog host that records every identifier it is asked to show.
#[derive(Default)]
struct RecordingDialogHost {
    shown: Vec<String>,
}

impl DialogHost for RecordingDialogHost {
    fn show_dialog(&mut self, id: &str) {
        self.shown.push(id.to_string());
    }
}

fn bridge_with_ada() -> Bridge<MemoryStore, NullDialogHost> {
    let mut store = MemoryStore::new();
    store.set(ADA_KEY, ADA_RECORD).unwrap();
    Bridge::new(store, NullDialogHost)
}

#[test]
fn test_load_names_yields_ada() {
    let mut bridge = bridge_with_ada();

    let response = bridge.handle(Request::LoadNames).unwrap();
    let Some(Response::GetNames { names }) = response else {
        panic!("load-names must produce a get-names response");
    };
    assert_eq!(names.len(), 1);
    assert_eq!(names[0].key.to_string(), ADA_KEY);
    assert_eq!(names[0].name, "Ada");
}

#[test]
fn test_delete_item_pushes_refreshed_names() {
    let mut bridge = bridge_with_ada();

    // Exactly one response, equal to what load-names would now produce.
    let response = bridge
        .handle(Request::DeleteItem {
            id: ADA_KEY.to_string(),
        })
        .unwrap();
    assert_eq!(response, Some(Response::GetNames { names: vec![] }));

    let follow_up = bridge.handle(Request::LoadNames).unwrap();
    assert_eq!(follow_up, Some(Response::GetNames { names: vec![] }));

    // And the record itself is gone.
    let item = bridge
        .handle(Request::LoadItem {
            id: ADA_KEY.to_string(),
        })
        .unwrap();
    assert_eq!(item, Some(Response::GetItem { value: None }));
}

#[test]
fn test_delete_refresh_matches_load_names_with_survivors() {
    let mut store = MemoryStore::new();
    store.set(ADA_KEY, ADA_RECORD).unwrap();
    store
        .set(
            "22222222-2222-2222-2222-222222222222",
            r#"{"demographics":{"name":"Grace"}}"#,
        )
        .unwrap();
    let mut bridge = Bridge::new(store, NullDialogHost);

    let deleted = bridge
        .handle(Request::DeleteItem {
            id: ADA_KEY.to_string(),
        })
        .unwrap();
    let reloaded = bridge.handle(Request::LoadNames).unwrap();
    assert_eq!(deleted, reloaded);

    let Some(Response::GetNames { names }) = reloaded else {
        panic!("load-names must produce a get-names response");
    };
    assert_eq!(names.len(), 1);
    assert_eq!(names[0].name, "Grace");
}

#[test]
fn test_delete_absent_key_still_pushes_names() {
    let mut bridge = bridge_with_ada();

    let response = bridge
        .handle(Request::DeleteItem {
            id: "99999999-9999-9999-9999-999999999999".to_string(),
        })
        .unwrap();
    let Some(Response::GetNames { names }) = response else {
        panic!("delete-item must produce a get-names response");
    };
    assert_eq!(names.len(), 1);
}

#[test]
fn test_show_dialog_drives_host_and_returns_nothing() {
    let mut bridge = Bridge::new(MemoryStore::new(), RecordingDialogHost::default());

    let response = bridge
        .handle(Request::ShowDialog {
            dialog: "#confirm-delete".to_string(),
        })
        .unwrap();
    assert_eq!(response, None);
    assert_eq!(bridge.dialogs().shown, vec!["#confirm-delete"]);
}

#[test]
fn test_load_item_absent_returns_explicit_none() {
    let mut bridge = Bridge::new(MemoryStore::new(), NullDialogHost);

    let response = bridge
        .handle(Request::LoadItem {
            id: ADA_KEY.to_string(),
        })
        .unwrap();
    assert_eq!(response, Some(Response::GetItem { value: None }));
}

#[test]
fn test_channel_runner_routes_responses_by_kind() {
    let (request_tx, request_rx) = mpsc::channel();
    let (item_tx, item_rx) = mpsc::channel();
    let (names_tx, names_rx) = mpsc::channel();

    let bridge = Bridge::new(MemoryStore::new(), NullDialogHost);
    let worker = thread::spawn(move || {
        bridge.run(
            request_rx,
            Outbound {
                items: item_tx,
                names: names_tx,
            },
        );
    });

    request_tx
        .send(Request::SaveItem {
            id: ADA_KEY.to_string(),
            value: ADA_RECORD.to_string(),
        })
        .unwrap();
    request_tx
        .send(Request::LoadItem {
            id: ADA_KEY.to_string(),
        })
        .unwrap();
    request_tx.send(Request::LoadNames).unwrap();
    request_tx
        .send(Request::DeleteItem {
            id: ADA_KEY.to_string(),
        })
        .unwrap();
    drop(request_tx);

    // save-item produced nothing; load-item answered on the item channel.
    assert_eq!(item_rx.recv().unwrap().as_deref(), Some(ADA_RECORD));

    // load-names then the delete refresh, in arrival order.
    let names = names_rx.recv().unwrap();
    assert_eq!(names.len(), 1);
    assert_eq!(names[0].name, "Ada");
    assert_eq!(names_rx.recv().unwrap(), vec![]);

    worker.join().expect("runner thread should exit cleanly");
    assert!(item_rx.recv().is_err());
}
