// Safe-State Check (Banker's algorithm)
use crate::state::ResourceState;
use tracing::debug;

/// Result of running the safety simulation to its fixed point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafetyOutcome {
    finish: Vec<bool>,
    passes: usize,
}

impl SafetyOutcome {
    /// True iff every process could be driven to completion.
    pub fn is_safe(&self) -> bool {
        self.finish.iter().all(|&done| done)
    }

    pub fn finish(&self) -> &[bool] {
        &self.finish
    }

    /// Number of scans over the process table, including the final unproductive one.
    pub fn passes(&self) -> usize {
        self.passes
    }

    /// Processes that can never be satisfied from this state.
    pub fn unfinished(&self) -> Vec<usize> {
        self.finish
            .iter()
            .enumerate()
            .filter_map(|(p, &done)| (!done).then_some(p))
            .collect()
    }
}

pub struct SafetyAnalyzer;

impl SafetyAnalyzer {
    pub fn is_safe_state(state: &ResourceState) -> bool {
        Self::evaluate(state).is_safe()
    }

    /// Repeatedly finish any process whose remaining need fits in `work`, releasing
    /// its allocation back into `work`, until a full pass finishes nobody.
    ///
    /// `work` never decreases, so the final `finish` vector does not depend on the
    /// scan order. Terminates after at most N + 1 passes.
    pub fn evaluate(state: &ResourceState) -> SafetyOutcome {
        let mut work = state.available().to_vec();
        let mut finish = vec![false; state.num_processes()];
        let mut passes = 0;

        loop {
            passes += 1;
            let mut progressed = false;

            for p in 0..state.num_processes() {
                if finish[p] {
                    continue;
                }

                let fits = state.need_row(p).zip(&work).all(|(need, w)| need <= *w);
                if fits {
                    for (w, held) in work.iter_mut().zip(&state.allocation()[p]) {
                        *w = w.saturating_add(*held);
                    }
                    finish[p] = true;
                    progressed = true;
                    debug!(process = p, pass = passes, "process can run to completion");
                }
            }

            if !progressed {
                break;
            }
        }

        SafetyOutcome { finish, passes }
    }
}
