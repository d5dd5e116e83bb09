use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::data::filter::Selection;
use crate::data::model::Dataset;
use crate::figure::Figure;

// ---------------------------------------------------------------------------
// Component ids
// ---------------------------------------------------------------------------

/// Input controls whose value changes drive the bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InputId {
    SiteDropdown,
    PayloadSlider,
}

impl InputId {
    pub fn component_id(self) -> &'static str {
        match self {
            InputId::SiteDropdown => "site-dropdown",
            InputId::PayloadSlider => "payload-slider",
        }
    }
}

/// Output properties recomputed by the bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OutputId {
    PayloadRangeLabel,
    SuccessPieChart,
    SuccessPayloadScatter,
}

impl OutputId {
    pub fn component_id(self) -> &'static str {
        match self {
            OutputId::PayloadRangeLabel => "payload-range",
            OutputId::SuccessPieChart => "success-pie-chart",
            OutputId::SuccessPayloadScatter => "success-payload-scatter-chart",
        }
    }
}

impl fmt::Display for InputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.component_id())
    }
}

impl fmt::Display for OutputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.component_id())
    }
}

/// New value for an output property.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputValue {
    Text(String),
    Figure(Figure),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BindingError {
    #[error("output '{0}' already has a binding")]
    DuplicateOutput(OutputId),
    #[error("binding for '{0}' declares no inputs")]
    NoInputs(OutputId),
}

// ---------------------------------------------------------------------------
// Bindings and dispatcher
// ---------------------------------------------------------------------------

pub type Callback = Box<dyn Fn(&Dataset, &Selection) -> OutputValue>;

/// One (output, inputs, function) triple.
pub struct Binding {
    pub output: OutputId,
    pub inputs: Vec<InputId>,
    callback: Callback,
}

impl Binding {
    fn depends_on(&self, changed: &BTreeSet<InputId>) -> bool {
        self.inputs.iter().any(|i| changed.contains(i))
    }
}

/// Maps input changes to the bindings that depend on them and keeps the
/// latest value of every output.
///
/// Everything runs on the UI thread: `notify` queues a change, `process`
/// drains the queue and runs each affected binding once, to completion.
pub struct Dispatcher {
    dataset: Arc<Dataset>,
    bindings: Vec<Binding>,
    outputs: BTreeMap<OutputId, OutputValue>,
    pending: BTreeSet<InputId>,
}

impl Dispatcher {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self {
            dataset,
            bindings: Vec::new(),
            outputs: BTreeMap::new(),
            pending: BTreeSet::new(),
        }
    }

    /// Declare that `output` is recomputed by `callback` whenever any of `inputs` changes.
    pub fn register<F>(
        &mut self,
        output: OutputId,
        inputs: &[InputId],
        callback: F,
    ) -> Result<(), BindingError>
    where
        F: Fn(&Dataset, &Selection) -> OutputValue + 'static,
    {
        if inputs.is_empty() {
            return Err(BindingError::NoInputs(output));
        }
        if self.bindings.iter().any(|b| b.output == output) {
            return Err(BindingError::DuplicateOutput(output));
        }
        log::debug!("binding {output} <- {inputs:?}");
        self.bindings.push(Binding {
            output,
            inputs: inputs.to_vec(),
            callback: Box::new(callback),
        });
        Ok(())
    }

    /// Queue a value change of `input`.
    pub fn notify(&mut self, input: InputId) {
        self.pending.insert(input);
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Run every binding affected by the queued changes, each at most once,
    /// in registration order.  Returns the number of invocations.
    pub fn process(&mut self, selection: &Selection) -> usize {
        if self.pending.is_empty() {
            return 0;
        }
        let changed = std::mem::take(&mut self.pending);
        let mut invoked = 0;
        for binding in &self.bindings {
            if binding.depends_on(&changed) {
                log::debug!("{} changed, recomputing {}", fmt_inputs(&changed), binding.output);
                let value = (binding.callback)(&self.dataset, selection);
                self.outputs.insert(binding.output, value);
                invoked += 1;
            }
        }
        invoked
    }

    /// Invoke every binding once, e.g. for the initial render.
    pub fn fire_all(&mut self, selection: &Selection) -> usize {
        self.pending.clear();
        for binding in &self.bindings {
            let value = (binding.callback)(&self.dataset, selection);
            self.outputs.insert(binding.output, value);
        }
        self.bindings.len()
    }

    pub fn output(&self, id: OutputId) -> Option<&OutputValue> {
        self.outputs.get(&id)
    }

    pub fn text(&self, id: OutputId) -> Option<&str> {
        match self.output(id)? {
            OutputValue::Text(s) => Some(s),
            OutputValue::Figure(_) => None,
        }
    }

    pub fn figure(&self, id: OutputId) -> Option<&Figure> {
        match self.output(id)? {
            OutputValue::Figure(fig) => Some(fig),
            OutputValue::Text(_) => None,
        }
    }
}

fn fmt_inputs(inputs: &BTreeSet<InputId>) -> String {
    inputs
        .iter()
        .map(|i| i.component_id())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::data::filter::{PayloadRange, SiteSelection};
    use crate::data::model::LaunchRecord;

    fn dispatcher() -> Dispatcher {
        let ds = Dataset::from_records(vec![LaunchRecord::new("A", 100.0, 1, "FT")]).unwrap();
        Dispatcher::new(Arc::new(ds))
    }

    fn selection(site: &str, lo: f64, hi: f64) -> Selection {
        Selection {
            site: SiteSelection::from_value(site),
            range: PayloadRange::new(lo, hi),
        }
    }

    /// Registers a text binding that counts its invocations.
    fn counting(d: &mut Dispatcher, output: OutputId, inputs: &[InputId]) -> Rc<Cell<usize>> {
        let calls = Rc::new(Cell::new(0));
        let c = calls.clone();
        d.register(output, inputs, move |_, sel| {
            c.set(c.get() + 1);
            OutputValue::Text(format!("{} {}", sel.site, sel.range.hi))
        })
        .unwrap();
        calls
    }

    #[test]
    fn only_dependent_bindings_fire() {
        let mut d = dispatcher();
        let label = counting(&mut d, OutputId::PayloadRangeLabel, &[InputId::PayloadSlider]);
        let pie = counting(
            &mut d,
            OutputId::SuccessPieChart,
            &[InputId::SiteDropdown, InputId::PayloadSlider],
        );

        d.notify(InputId::SiteDropdown);
        assert_eq!(d.process(&selection("A", 0.0, 10.0)), 1);
        assert_eq!((label.get(), pie.get()), (0, 1));
        assert_eq!(d.text(OutputId::SuccessPieChart), Some("A 10"));
        assert!(d.output(OutputId::PayloadRangeLabel).is_none());

        d.notify(InputId::PayloadSlider);
        assert_eq!(d.process(&selection("A", 0.0, 20.0)), 2);
        assert_eq!((label.get(), pie.get()), (1, 2));
        assert_eq!(d.text(OutputId::PayloadRangeLabel), Some("A 20"));
    }

    #[test]
    fn repeated_notifications_coalesce() {
        let mut d = dispatcher();
        let pie = counting(
            &mut d,
            OutputId::SuccessPieChart,
            &[InputId::SiteDropdown, InputId::PayloadSlider],
        );
        d.notify(InputId::SiteDropdown);
        d.notify(InputId::PayloadSlider);
        d.notify(InputId::PayloadSlider);
        assert!(d.has_pending());
        assert_eq!(d.process(&selection("ALL", 0.0, 1.0)), 1);
        assert_eq!(pie.get(), 1);
        assert!(!d.has_pending());
        assert_eq!(d.process(&selection("ALL", 0.0, 1.0)), 0);
    }

    #[test]
    fn fire_all_renders_everything() {
        let mut d = dispatcher();
        let label = counting(&mut d, OutputId::PayloadRangeLabel, &[InputId::PayloadSlider]);
        let scatter = counting(&mut d, OutputId::SuccessPayloadScatter, &[InputId::SiteDropdown]);
        d.notify(InputId::SiteDropdown);
        assert_eq!(d.fire_all(&selection("ALL", 0.0, 5.0)), 2);
        assert_eq!((label.get(), scatter.get()), (1, 1));
        assert!(!d.has_pending());
        assert_eq!(d.text(OutputId::SuccessPayloadScatter), Some("ALL 5"));
        assert!(d.figure(OutputId::SuccessPayloadScatter).is_none());
    }

    #[test]
    fn registration_errors() {
        let mut d = dispatcher();
        counting(&mut d, OutputId::PayloadRangeLabel, &[InputId::PayloadSlider]);
        let dup = d.register(OutputId::PayloadRangeLabel, &[InputId::SiteDropdown], |_, _| {
            OutputValue::Text(String::new())
        });
        assert_eq!(dup, Err(BindingError::DuplicateOutput(OutputId::PayloadRangeLabel)));

        let none = d.register(OutputId::SuccessPieChart, &[], |_, _| {
            OutputValue::Text(String::new())
        });
        assert_eq!(none, Err(BindingError::NoInputs(OutputId::SuccessPieChart)));
    }
}
