//! Enter callbacks
//!
//! Handlers run when the host signals that the user pressed Enter. They are
//! dispatched in registration order as a chain of responsibility: a handler
//! returning [`CallbackFlow::Stop`] ends the chain unless the console uses
//! [`CallbackPolicy::InvokeAll`].

use serde::{Deserialize, Serialize};

use super::model::Console;
use crate::text::CodepointBuffer;

/// Result of one enter handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackFlow {
    /// Forward the input line to the next handler
    Continue,
    /// The input line was consumed
    Stop,
}

impl CallbackFlow {
    /// Whether the handler asked to end dispatch
    pub fn is_stop(self) -> bool {
        self == Self::Stop
    }
}

impl From<bool> for CallbackFlow {
    /// `true` means consumed, matching the usual handler convention
    fn from(consumed: bool) -> Self {
        if consumed {
            Self::Stop
        } else {
            Self::Continue
        }
    }
}

/// How [`CallbackFlow::Stop`] affects the remaining handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CallbackPolicy {
    /// A `Stop` result skips every later handler
    #[default]
    StopOnSignal,
    /// Every handler runs regardless of results
    InvokeAll,
}

/// Enter handler trait
///
/// `input` is a snapshot of the input line at the time Enter was triggered.
/// The console itself is mutable, so a handler can echo to the output, clear
/// the input or change the prompt. Closures of the matching shape implement
/// this trait.
pub trait EnterHandler {
    /// Handle a submitted input line
    fn on_enter(&mut self, console: &mut Console, input: &CodepointBuffer) -> CallbackFlow;
}

impl<F> EnterHandler for F
where
    F: FnMut(&mut Console, &CodepointBuffer) -> CallbackFlow,
{
    fn on_enter(&mut self, console: &mut Console, input: &CodepointBuffer) -> CallbackFlow {
        self(console, input)
    }
}

/// Ordered, append-only list of enter handlers
#[derive(Default)]
pub(crate) struct CallbackList {
    handlers: Vec<Box<dyn EnterHandler>>,
}

impl CallbackList {
    pub(crate) fn push(&mut self, handler: Box<dyn EnterHandler>) {
        self.handlers.push(handler);
    }

    pub(crate) fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Move the handlers out for dispatch
    pub(crate) fn take(&mut self) -> Vec<Box<dyn EnterHandler>> {
        std::mem::take(&mut self.handlers)
    }

    /// Put dispatched handlers back in front of any registered meanwhile
    pub(crate) fn restore(&mut self, mut dispatched: Vec<Box<dyn EnterHandler>>) {
        dispatched.append(&mut self.handlers);
        self.handlers = dispatched;
    }
}

impl std::fmt::Debug for CallbackList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackList")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

/// Run `handlers` in order until one stops the chain (per `policy`)
///
/// Returns how many handlers were invoked.
pub(crate) fn dispatch(
    handlers: &mut [Box<dyn EnterHandler>],
    console: &mut Console,
    input: &CodepointBuffer,
    policy: CallbackPolicy,
) -> usize {
    let mut invoked = 0;
    for (index, handler) in handlers.iter_mut().enumerate() {
        invoked += 1;
        let flow = handler.on_enter(console, input);
        log::trace!("Enter handler {} returned {:?}", index, flow);
        if flow.is_stop() && policy == CallbackPolicy::StopOnSignal {
            break;
        }
    }
    invoked
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountingHandler {
        calls: usize,
    }

    impl EnterHandler for CountingHandler {
        fn on_enter(&mut self, _console: &mut Console, _input: &CodepointBuffer) -> CallbackFlow {
            self.calls += 1;
            CallbackFlow::Continue
        }
    }

    #[test]
    fn test_flow_from_bool() {
        assert_eq!(CallbackFlow::from(true), CallbackFlow::Stop);
        assert_eq!(CallbackFlow::from(false), CallbackFlow::Continue);
        assert!(CallbackFlow::Stop.is_stop());
    }

    #[test]
    fn test_dispatch_policies() {
        let mut console = Console::new();
        let input = CodepointBuffer::new(4);

        let mut handlers: Vec<Box<dyn EnterHandler>> = vec![
            Box::new(|_: &mut Console, _: &CodepointBuffer| CallbackFlow::Stop),
            Box::new(CountingHandler { calls: 0 }),
        ];

        let invoked = dispatch(&mut handlers, &mut console, &input, CallbackPolicy::StopOnSignal);
        assert_eq!(invoked, 1);

        let invoked = dispatch(&mut handlers, &mut console, &input, CallbackPolicy::InvokeAll);
        assert_eq!(invoked, 2);
    }

    #[test]
    fn test_restore_keeps_registration_order() {
        let mut list = CallbackList::default();
        list.push(Box::new(CountingHandler { calls: 0 }));

        let taken = list.take();
        assert_eq!(list.len(), 0);
        list.push(Box::new(CountingHandler { calls: 0 }));
        list.restore(taken);
        assert_eq!(list.len(), 2);
    }
}
