use js_sys::Function;
use rutable_core::{PageView, PagerButton, Renderer};
use serde::Serialize;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

/// JavaScript calls waiting for the table borrow to end.
///
/// Arguments are converted when the call is queued, so callbacks see the state
/// at the moment of the render or event.
#[derive(Clone, Default)]
pub(crate) struct CallQueue {
    calls: Rc<RefCell<VecDeque<(Function, JsValue)>>>,
}

impl CallQueue {
    pub(crate) fn push<T: Serialize + ?Sized>(&self, callback: &Function, value: &T) {
        match serde_wasm_bindgen::to_value(value) {
            Ok(arg) => self.calls.borrow_mut().push_back((callback.clone(), arg)),
            Err(err) => tracing::warn!(error = %err, "failed to convert callback argument"),
        }
    }

    /// Run queued calls in order. Calls queued by a callback run in the same pass.
    pub(crate) fn flush(&self) {
        loop {
            let next = self.calls.borrow_mut().pop_front();
            let Some((callback, arg)) = next else {
                break;
            };
            if let Err(err) = callback.call1(&JsValue::NULL, &arg) {
                web_sys::console::error_2(&JsValue::from_str("RuTable callback failed:"), &err);
            }
        }
    }
}

/// Renderer that forwards render instructions to JavaScript callbacks.
/// Unset callbacks are skipped.
#[derive(Default)]
pub struct JsRenderer {
    pub(crate) page: Option<Function>,
    pub(crate) pager: Option<Function>,
    pub(crate) info: Option<Function>,
    pub(crate) message: Option<Function>,
    queue: CallQueue,
}

impl JsRenderer {
    pub(crate) fn new(queue: CallQueue) -> Self {
        JsRenderer {
            queue,
            ..Default::default()
        }
    }
}

impl Renderer for JsRenderer {
    fn render_page(&mut self, view: &PageView) {
        if let Some(callback) = &self.page {
            self.queue.push(callback, view);
        }
    }

    fn render_pager(&mut self, buttons: &[PagerButton]) {
        if let Some(callback) = &self.pager {
            self.queue.push(callback, buttons);
        }
    }

    fn render_info(&mut self, info: &str) {
        if let Some(callback) = &self.info {
            self.queue.push(callback, info);
        }
    }

    fn render_message(&mut self, message: &str) {
        if let Some(callback) = &self.message {
            self.queue.push(callback, message);
        }
    }
}
