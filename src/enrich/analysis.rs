//! Derived metrics over call-frame trees
//!
//! The aggregates here are computed with an explicit work-stack traversal
//! rather than recursion, so pathologically deep call traces cannot blow the
//! stack. Results are computed once per response and memoized by the
//! enrichment wrappers.

use std::collections::{BTreeMap, BTreeSet};

use crate::types::{CallFrame, PrestateTraceResponse, TracerResponse};

/// Aggregate metrics derived from one tracer response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraceAnalysis {
    /// Number of call frames, including the root
    pub call_count: u64,

    /// Greatest call depth reached; the root is at depth 0
    pub max_depth: u32,

    /// Unique lowercase addresses seen as `from` or `to` in any frame
    pub accounts: BTreeSet<String>,

    /// Storage slots touched, grouped by lowercase account address
    pub storage_slots: BTreeMap<String, BTreeSet<String>>,

    /// Unique 4-byte function selectors observed
    pub selectors: BTreeSet<String>,
}

impl TraceAnalysis {
    /// Computes all aggregates for a tracer response in one pass
    pub fn collect(response: &TracerResponse) -> Self {
        let mut analysis = Self::default();

        if let Some(call_tracer) = &response.call_tracer {
            analysis.walk_frames(&call_tracer.root_call, response.four_byte_tracer.is_none());
        }

        if let Some(four_byte) = &response.four_byte_tracer {
            for selector in four_byte.identifiers.keys() {
                analysis.selectors.insert(selector.to_ascii_lowercase());
            }
        }

        if let Some(prestate) = &response.prestate_tracer {
            analysis.collect_storage(prestate);
        }

        analysis
    }

    /// Iterative depth-first walk over the call tree
    fn walk_frames(&mut self, root: &CallFrame, selectors_from_input: bool) {
        let mut stack: Vec<(&CallFrame, u32)> = vec![(root, 0)];
        while let Some((frame, depth)) = stack.pop() {
            self.call_count += 1;
            self.max_depth = self.max_depth.max(depth);

            self.accounts.insert(frame.from.to_ascii_lowercase());
            if let Some(to) = &frame.to {
                self.accounts.insert(to.to_ascii_lowercase());
            }

            // Fallback selector extraction: `0x` + 8 hex chars of calldata
            if selectors_from_input && frame.input.len() >= 10 {
                self.selectors.insert(frame.input[..10].to_ascii_lowercase());
            }

            for child in &frame.calls {
                stack.push((child, depth + 1));
            }
        }
    }

    fn collect_storage(&mut self, prestate: &PrestateTraceResponse) {
        let account_sets: Vec<_> = match prestate {
            PrestateTraceResponse::Default(mode) => vec![&mode.accounts],
            PrestateTraceResponse::Diff(diff) => vec![&diff.pre, &diff.post],
        };
        for accounts in account_sets {
            for (address, state) in accounts {
                if state.storage.is_empty() {
                    continue;
                }
                let slots = self
                    .storage_slots
                    .entry(address.to_ascii_lowercase())
                    .or_default();
                for slot in state.storage.keys() {
                    slots.insert(slot.to_ascii_lowercase());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AccountState, CallTraceResponse, FourByteInfo, FourByteResponse,
        PrestateDefaultMode};
    use std::collections::HashMap;

    fn frame(from: &str, to: &str, input: &str, calls: Vec<CallFrame>) -> CallFrame {
        CallFrame {
            call_type: "CALL".into(),
            from: from.into(),
            to: Some(to.into()),
            value: "0x0".into(),
            gas: "0x0".into(),
            gas_used: "0x0".into(),
            input: input.into(),
            output: "0x".into(),
            depth: 0,
            reverted: false,
            error: None,
            revert_reason: None,
            calls,
            logs: vec![],
        }
    }

    fn response_with_root(root: CallFrame) -> TracerResponse {
        TracerResponse {
            call_tracer: Some(CallTraceResponse { root_call: root, total_calls: 0, max_depth: 0 }),
            ..TracerResponse::default()
        }
    }

    #[test]
    fn counts_frames_and_depth() {
        let root = frame(
            "0xaa00000000000000000000000000000000000001",
            "0xaa00000000000000000000000000000000000002",
            "0xa9059cbb00",
            vec![frame(
                "0xaa00000000000000000000000000000000000002",
                "0xaa00000000000000000000000000000000000003",
                "0x",
                vec![frame(
                    "0xaa00000000000000000000000000000000000003",
                    "0xaa00000000000000000000000000000000000004",
                    "0x",
                    vec![],
                )],
            )],
        );
        let analysis = TraceAnalysis::collect(&response_with_root(root));
        assert_eq!(analysis.call_count, 3);
        assert_eq!(analysis.max_depth, 2);
        assert_eq!(analysis.accounts.len(), 4);
    }

    #[test]
    fn deduplicates_accounts_case_insensitively() {
        let root = frame(
            "0xAA00000000000000000000000000000000000001",
            "0xaa00000000000000000000000000000000000001",
            "0x",
            vec![],
        );
        let analysis = TraceAnalysis::collect(&response_with_root(root));
        assert_eq!(analysis.accounts.len(), 1);
    }

    #[test]
    fn prefers_four_byte_tracer_for_selectors() {
        let root = frame(
            "0xaa00000000000000000000000000000000000001",
            "0xaa00000000000000000000000000000000000002",
            "0xdeadbeef00",
            vec![],
        );
        let mut response = response_with_root(root);
        response.four_byte_tracer = Some(FourByteResponse {
            identifiers: HashMap::from([(
                "0xa9059cbb".to_string(),
                FourByteInfo { data_size: 64, count: 1 },
            )]),
            total_identifiers: 1,
        });
        let analysis = TraceAnalysis::collect(&response);
        // Input-derived selectors are skipped when the dedicated tracer ran
        assert_eq!(analysis.selectors, BTreeSet::from(["0xa9059cbb".to_string()]));
    }

    #[test]
    fn falls_back_to_input_selectors() {
        let root = frame(
            "0xaa00000000000000000000000000000000000001",
            "0xaa00000000000000000000000000000000000002",
            "0xA9059CBB0000",
            vec![frame(
                "0xaa00000000000000000000000000000000000002",
                "0xaa00000000000000000000000000000000000003",
                // Too short to carry a selector
                "0x01",
                vec![],
            )],
        );
        let analysis = TraceAnalysis::collect(&response_with_root(root));
        assert_eq!(analysis.selectors, BTreeSet::from(["0xa9059cbb".to_string()]));
    }

    #[test]
    fn pairs_storage_slots_with_addresses() {
        let mut response = TracerResponse::default();
        response.prestate_tracer = Some(PrestateTraceResponse::Default(PrestateDefaultMode {
            accounts: HashMap::from([
                (
                    "0xAA00000000000000000000000000000000000001".to_string(),
                    AccountState {
                        storage: HashMap::from([
                            ("0x01".to_string(), "0x0a".to_string()),
                            ("0x02".to_string(), "0x0b".to_string()),
                        ]),
                        ..AccountState::default()
                    },
                ),
                (
                    "0xaa00000000000000000000000000000000000002".to_string(),
                    AccountState::default(),
                ),
            ]),
        }));
        let analysis = TraceAnalysis::collect(&response);
        assert_eq!(analysis.storage_slots.len(), 1);
        let slots = &analysis.storage_slots["0xaa00000000000000000000000000000000000001"];
        assert_eq!(slots.len(), 2);
    }
}
