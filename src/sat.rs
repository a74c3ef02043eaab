use std::collections::HashMap;

use num_bigint::BigUint;

use crate::manager::Manager;
use crate::reference::BddId;

impl Manager {
    /// Returns one satisfying cube of `f`, if any exists.
    ///
    /// The cube lists `(variable, value)` pairs from the top of the diagram
    /// down. Variables absent from the cube are don't-cares.
    pub fn one_sat(&self, f: BddId) -> Option<Vec<(BddId, bool)>> {
        if f == BddId::FALSE {
            return None;
        }

        let mut path = Vec::new();
        let mut current = f;

        // In a reduced diagram every non-zero node reaches the one terminal.
        while current != BddId::TRUE {
            let node = self.node(current);
            if node.high != BddId::FALSE {
                path.push((node.top, true));
                current = node.high;
            } else {
                path.push((node.top, false));
                current = node.low;
            }
        }

        Some(path)
    }

    /// Number of satisfying assignments of `f` over all variables of the manager.
    pub fn sat_count(&self, f: BddId) -> BigUint {
        let vars = self.variables();
        self.sat_count_over(f, &vars)
    }

    /// Number of satisfying assignments of `f` over `vars`.
    ///
    /// # Panics
    ///
    /// Panics if `f` depends on a variable missing from `vars`.
    pub fn sat_count_over(&self, f: BddId, vars: &[BddId]) -> BigUint {
        let mut vars = vars.to_vec();
        vars.sort();
        vars.dedup();

        let num_vars = vars.len();
        let level = |f: BddId| -> usize {
            if f.is_constant() {
                return num_vars;
            }
            let top = self.top_var(f);
            vars.binary_search(&top)
                .unwrap_or_else(|_| panic!("Function depends on {} which is not counted", self.label(top)))
        };

        let mut cache = HashMap::new();
        let count = self.sat_count_(f, &level, &mut cache);
        count << level(f)
    }

    /// Count over the variables at or below the level of `f`.
    fn sat_count_(
        &self,
        f: BddId,
        level: &dyn Fn(BddId) -> usize,
        cache: &mut HashMap<BddId, BigUint>,
    ) -> BigUint {
        if f == BddId::FALSE {
            return BigUint::ZERO;
        }
        if f == BddId::TRUE {
            return BigUint::from(1u32);
        }
        if let Some(count) = cache.get(&f) {
            return count.clone();
        }

        let node = self.node(f);
        let l = level(f);
        let count_high = self.sat_count_(node.high, level, cache) << (level(node.high) - l - 1);
        let count_low = self.sat_count_(node.low, level, cache) << (level(node.low) - l - 1);
        let count = count_high + count_low;

        cache.insert(f, count.clone());
        count
    }
}
