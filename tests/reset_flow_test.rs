//! End-to-end reset flows: event buttons, widgets and the JSON state file

use dnd_ui_toolkit::domains::{
    ConsumableState, ConsumablesBlock, EventButtonsBlock, HealthBlock, HealthState,
};
use dnd_ui_toolkit::events::{EventBus, FileContext};
use dnd_ui_toolkit::storage::{open_state_file, KeyValueStore};
use dnd_ui_toolkit::widgets::{ConsumableWidget, EventButtons, HealthWidget};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

const SHEET: &str = "Characters/Tordek.md";

fn state_file(dir: &TempDir) -> std::path::PathBuf {
    dir.path().join(".dnd-ui-toolkit-state.json")
}

fn read_state(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn test_short_rest_button_restores_one_ki_point() {
    let dir = TempDir::new().unwrap();
    let path = state_file(&dir);
    fs::write(&path, r#"{"state": {"ki": {"value": 2}}}"#).unwrap();

    let kv = Arc::new(open_state_file(&path));
    let ctx = FileContext::new(SHEET, EventBus::new());
    let block = ConsumablesBlock::parse("label: Ki\nstate_key: ki\nuses: 4\nreset_on: [short-rest]\n").unwrap();
    let widgets = ConsumableWidget::mount_all(&ctx, kv, block).await.unwrap();
    let ki = &widgets[0];

    let buttons = EventButtonsBlock::parse(
        "items:\n  - name: Catch Breath\n    value:\n      event: short-rest\n      amount: 1\n  - name: Short Rest\n    value: short-rest\n",
    )
    .unwrap();

    EventButtons::press(&ctx, &buttons.items[0]);
    ki.flush().await;
    assert_eq!(ki.state(), ConsumableState::new(1));
    assert_eq!(read_state(&path)["state"]["ki"], json!({"value": 1}));

    EventButtons::press(&ctx, &buttons.items[1]);
    ki.flush().await;
    assert_eq!(read_state(&path)["state"]["ki"], json!({"value": 0}));
}

#[tokio::test]
async fn test_long_rest_fully_restores_health() {
    let dir = TempDir::new().unwrap();
    let path = state_file(&dir);
    fs::write(
        &path,
        r#"{"state": {"tordek_hp": {"current": 5, "temporary": 3, "hitdiceUsed": 2, "deathSaveSuccesses": 0, "deathSaveFailures": 1}}}"#,
    )
    .unwrap();

    let kv = Arc::new(open_state_file(&path));
    let ctx = FileContext::new(SHEET, EventBus::new());
    let block = HealthBlock::parse("state_key: tordek_hp\nhealth: 20\nhitdice:\n  dice: d10\n  value: 3\n").unwrap();
    let hp = HealthWidget::mount(&ctx, kv, block).await.unwrap();

    assert_eq!(ctx.publish_reset("long-rest", None), 1);
    hp.flush().await;

    assert_eq!(hp.state(), HealthState::full(20));
    assert_eq!(
        read_state(&path)["state"]["tordek_hp"],
        json!({"current": 20, "temporary": 0, "hitdiceUsed": 0, "deathSaveSuccesses": 0, "deathSaveFailures": 0})
    );
}

#[tokio::test]
async fn test_state_survives_a_new_session() {
    let dir = TempDir::new().unwrap();
    let path = state_file(&dir);
    let block = HealthBlock::parse("state_key: hp\nhealth: 12\n").unwrap();

    {
        let kv = Arc::new(open_state_file(&path));
        let ctx = FileContext::new(SHEET, EventBus::new());
        let hp = HealthWidget::mount(&ctx, kv, block.clone()).await.unwrap();
        hp.damage(7).await.unwrap();
        hp.unload();
    }

    let kv: Arc<KeyValueStore> = Arc::new(open_state_file(&path));
    let ctx = FileContext::new(SHEET, EventBus::new());
    let hp = HealthWidget::mount(&ctx, kv, block).await.unwrap();
    assert_eq!(hp.state().current, 5);
}

#[tokio::test]
async fn test_buttons_in_other_documents_do_not_reset() {
    let dir = TempDir::new().unwrap();
    let kv = Arc::new(open_state_file(state_file(&dir)));
    let bus = EventBus::new();
    let tordek = FileContext::new(SHEET, bus.clone());
    let regdar = FileContext::new("Characters/Regdar.md", bus);

    let hp = HealthWidget::mount(&tordek, kv, HealthBlock::parse("state_key: hp\nhealth: 10\n").unwrap())
        .await
        .unwrap();
    hp.damage(4).await.unwrap();

    assert_eq!(regdar.publish_reset("long-rest", None), 0);
    hp.flush().await;
    assert_eq!(hp.state().current, 6);
}
