//! Responses evaluated after every close.

use indexmap::IndexMap;
use tracing::info;
use tremor_core::{FieldError, FieldId};
use tremor_fields::FieldStore;
use tremor_model::Clock;

use crate::config::{Reduction, ResponseKind, ResponseSpec};

/// One recorded history sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    /// Step counter at the close.
    pub step: u64,
    /// Simulation time at the close.
    pub time: f64,
    /// Reduced field value.
    pub value: f64,
}

#[derive(Debug)]
enum Response {
    History {
        field: FieldId,
        reduction: Reduction,
        samples: Vec<Sample>,
    },
    Log {
        every: u64,
    },
}

/// Named responses in declaration order.
#[derive(Debug, Default)]
pub struct Responses {
    entries: IndexMap<String, Response>,
}

impl Responses {
    /// Resolve the field names of `specs`.
    pub fn resolve(specs: &[ResponseSpec], fields: &FieldStore) -> Result<Self, FieldError> {
        let mut entries = IndexMap::new();
        for spec in specs {
            let response = match &spec.kind {
                ResponseKind::History { field, reduction } => Response::History {
                    field: fields.find(field)?,
                    reduction: *reduction,
                    samples: Vec::new(),
                },
                ResponseKind::Log { every } => Response::Log { every: *every },
            };
            entries.insert(spec.name.clone(), response);
        }
        Ok(Self { entries })
    }

    /// Record histories and emit due log lines.
    pub fn evaluate(&mut self, fields: &FieldStore, clock: &Clock) -> Result<(), FieldError> {
        for (name, response) in &mut self.entries {
            match response {
                Response::History {
                    field,
                    reduction,
                    samples,
                } => {
                    let data = fields.read(*field)?;
                    samples.push(Sample {
                        step: clock.step,
                        time: clock.time,
                        value: reduce(*reduction, data),
                    });
                }
                Response::Log { every } => {
                    if clock.step % *every == 0 {
                        info!(
                            response = %name,
                            step = clock.step,
                            time = clock.time,
                            dt = clock.dt,
                            "progress"
                        );
                    }
                }
            }
        }
        Ok(())
    }

    /// Samples of a history response; `None` for unknown names and logs.
    pub fn history(&self, name: &str) -> Option<&[Sample]> {
        match self.entries.get(name)? {
            Response::History { samples, .. } => Some(samples),
            Response::Log { .. } => None,
        }
    }

    /// Response names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Move every recorded history out, keyed by response name.
    pub fn into_histories(self) -> IndexMap<String, Vec<Sample>> {
        self.entries
            .into_iter()
            .filter_map(|(name, response)| match response {
                Response::History { samples, .. } => Some((name, samples)),
                Response::Log { .. } => None,
            })
            .collect()
    }
}

fn reduce(reduction: Reduction, data: &[f64]) -> f64 {
    match reduction {
        Reduction::Min => data.iter().copied().fold(f64::INFINITY, f64::min),
        Reduction::Max => data.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        Reduction::Sum => data.iter().sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tremor_core::Location;
    use tremor_mesh::{build_box, BoxSpec, ElementType};

    #[test]
    fn history_records_every_evaluation() {
        let mesh = build_box(ElementType::Bar2, &BoxSpec::default()).unwrap();
        let mut fields = FieldStore::new(&mesh);
        let id = fields.define("p", "pressure", 1, Location::Node, true, &["body"]).unwrap();
        let specs = [
            ResponseSpec {
                name: "peak".into(),
                kind: ResponseKind::History {
                    field: "pressure".into(),
                    reduction: Reduction::Max,
                },
            },
            ResponseSpec {
                name: "total".into(),
                kind: ResponseKind::History {
                    field: "p".into(),
                    reduction: Reduction::Sum,
                },
            },
            ResponseSpec {
                name: "progress".into(),
                kind: ResponseKind::Log { every: 2 },
            },
        ];
        let mut responses = Responses::resolve(&specs, &fields).unwrap();
        let mut clock = Clock::new(0.0, 1.0, 10);

        fields.assign(id, vec![1.0, -3.0]).unwrap();
        responses.evaluate(&fields, &clock).unwrap();
        clock.step = 1;
        clock.time = 0.5;
        fields.assign(id, vec![4.0, 2.0]).unwrap();
        responses.evaluate(&fields, &clock).unwrap();

        let peak = responses.history("peak").unwrap();
        assert_eq!(peak.len(), 2);
        assert_eq!(peak[1], Sample { step: 1, time: 0.5, value: 4.0 });
        assert_eq!(responses.history("total").unwrap()[0].value, -2.0);
        assert!(responses.history("progress").is_none());
        assert_eq!(
            responses.names().collect::<Vec<_>>(),
            vec!["peak", "total", "progress"]
        );
        assert_eq!(responses.into_histories().len(), 2);
    }

    #[test]
    fn unknown_field_is_rejected() {
        let mesh = build_box(ElementType::Bar2, &BoxSpec::default()).unwrap();
        let fields = FieldStore::new(&mesh);
        let specs = [ResponseSpec {
            name: "peak".into(),
            kind: ResponseKind::History {
                field: "nope".into(),
                reduction: Reduction::Min,
            },
        }];
        assert!(matches!(
            Responses::resolve(&specs, &fields),
            Err(FieldError::Undefined { .. })
        ));
    }
}
