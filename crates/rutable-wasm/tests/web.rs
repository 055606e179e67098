//! Browser tests for the JavaScript callback surface

#![cfg(target_arch = "wasm32")]

use js_sys::{Array, Function, Reflect};
use rutable_wasm::DataGrid;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::*;

const CONFIG: &str = r#"{
    "perPage": 2,
    "data": {"headings": ["Name", "Age"], "data": [["Bob", 30], ["Ann", 25], ["Cid", 41]]}
}"#;

/// A function that pushes its argument onto `sink`
fn collector(sink: &Array) -> Function {
    Function::new_with_args("sink, value", "sink.push(value)").bind1(&JsValue::NULL, sink)
}

fn get(value: &JsValue, key: &str) -> JsValue {
    Reflect::get(value, &JsValue::from_str(key)).unwrap()
}

#[wasm_bindgen_test]
fn page_renderer_receives_view() {
    let pages = Array::new();
    let grid = DataGrid::new(CONFIG).unwrap();
    grid.set_page_renderer(Some(collector(&pages)));
    grid.init().unwrap();

    assert_eq!(pages.length(), 1);
    let rows = Array::from(&get(&pages.get(0), "rows"));
    assert_eq!(rows.length(), 2);
}

#[wasm_bindgen_test]
fn message_renderer_on_empty_search() {
    let messages = Array::new();
    let grid = DataGrid::new(CONFIG).unwrap();
    grid.set_message_renderer(Some(collector(&messages)));
    grid.init().unwrap();

    assert!(grid.search("nobody", None));
    assert_eq!(messages.get(0).as_string().as_deref(), Some("No entries found"));
}

#[wasm_bindgen_test]
fn events_reach_listeners() {
    let events = Array::new();
    let grid = DataGrid::new(CONFIG).unwrap();
    grid.init().unwrap();

    let listener = grid.on("columns.sort", collector(&events)).unwrap();
    assert!(grid.sort(1, None));
    assert_eq!(events.length(), 1);
    assert_eq!(get(&events.get(0), "event").as_string().as_deref(), Some("columns.sort"));

    assert!(grid.off(listener));
    grid.sort(1, None);
    assert_eq!(events.length(), 1);

    assert!(grid.on("rows.sort", collector(&events)).is_err());
}

/// Wrap a Rust closure as a JavaScript function that lives for the whole test run
fn function(f: impl FnMut(JsValue) + 'static) -> Function {
    let closure = Closure::<dyn FnMut(JsValue)>::new(f);
    let function = closure.as_ref().unchecked_ref::<Function>().clone();
    closure.forget();
    function
}

#[wasm_bindgen_test]
fn listeners_can_call_back_into_the_grid() {
    let grid = Rc::new(DataGrid::new(CONFIG).unwrap());
    grid.init().unwrap();

    let seen = Array::new();
    let reader = Rc::clone(&grid);
    let sink = seen.clone();
    grid.on(
        "page",
        function(move |_event| {
            sink.push(&JsValue::from_str(&reader.info()));
            sink.push(&JsValue::from_f64(reader.current_page() as f64));
        }),
    )
    .unwrap();

    assert!(grid.page(2));
    assert_eq!(seen.length(), 2);
    assert_eq!(seen.get(0).as_string().as_deref(), Some("Showing 3 to 3 of 3 entries"));
    assert_eq!(seen.get(1).as_f64(), Some(2.0));
}

#[wasm_bindgen_test]
fn callbacks_can_change_the_grid() {
    let pages = Array::new();
    let grid = Rc::new(DataGrid::new(CONFIG).unwrap());
    grid.set_page_renderer(Some(collector(&pages)));
    grid.init().unwrap();

    let writer = Rc::clone(&grid);
    grid.on(
        "columns.sort",
        function(move |_event| {
            writer.page(2);
        }),
    )
    .unwrap();

    assert!(grid.sort(0, None));
    assert_eq!(grid.current_page(), 2);
    let rows = Array::from(&get(&pages.get(pages.length() - 1), "rows"));
    assert_eq!(rows.length(), 1);
}

#[wasm_bindgen_test]
fn set_message_reaches_message_renderer() {
    let messages = Array::new();
    let grid = DataGrid::new(CONFIG).unwrap();
    grid.set_message_renderer(Some(collector(&messages)));
    grid.init().unwrap();

    grid.set_message("Loading...");
    assert_eq!(messages.length(), 1);
    assert_eq!(messages.get(0).as_string().as_deref(), Some("Loading..."));
}

#[wasm_bindgen_test]
fn errors_carry_codes() {
    let err = DataGrid::new(r#"{"perPage": 0}"#).err().unwrap();
    assert_eq!(get(&err, "code").as_string().as_deref(), Some("INVALID_CONFIG"));

    let grid = DataGrid::new(CONFIG).unwrap();
    let err = grid.import(r#"{"type": "json", "data": "{oops"}"#).err().unwrap();
    assert_eq!(get(&err, "code").as_string().as_deref(), Some("IMPORT_FAILED"));
}
