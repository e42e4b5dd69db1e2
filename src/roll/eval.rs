use super::{error::EvalError, outcome::*, EResult, RollContext};
use crate::common::*;
use crate::parse::ast::{BinaryOperation, DiceRoll, Evaluate, NumberLiteral};
use log::debug;

impl Evaluate for NumberLiteral {
    fn eval(&self, _: &mut RollContext<'_>) -> EResult<RollOutcome> {
        Ok(RollOutcome::constant(self.value))
    }
}

impl Evaluate for DiceRoll {
    fn eval(&self, ctx: &mut RollContext<'_>) -> EResult<RollOutcome> {
        let count = self.count as usize;
        ctx.reserve(count)?;

        let max_face = self.sides.max_face();
        let mut raw = Vec::with_capacity(count.min(1024));
        for _ in 0..count {
            let mut die = ctx.roll_one(self.sides)?;
            while self.explode && die.value == max_face {
                raw.push(die);
                die = ctx.roll_one(self.sides)?;
            }
            raw.push(die);
        }

        let kept = select(&raw, self.mode, self.mode_count as usize);
        let total = kept
            .iter()
            .try_fold(0 as Int, |acc, die| acc.checked_add(die.value))
            .ok_or(EvalError::Overflow)?;

        let kept_count = kept.len() as Int;
        let minimum = kept_count * self.sides.min_face();
        let maximum = kept_count
            .checked_mul(self.sides.max_face())
            .ok_or(EvalError::Overflow)?;
        let average = if self.mode.is_active() {
            kept.len() as Float * self.sides.average()
        } else {
            self.count as Float * self.sides.average()
        };

        debug!("{}: {} of {} dice kept, total {}", self, kept.len(), raw.len(), total);
        Ok(RollOutcome::new(total, minimum, maximum, average, raw, kept))
    }
}

/// Picks the kept dice by value, preserving draw order among them.
fn select(raw: &[DieResult], mode: KeepDropMode, n: usize) -> Vec<DieResult> {
    let mut ranked: Vec<usize> = (0..raw.len()).collect();
    match mode {
        KeepDropMode::None => return raw.to_vec(),
        KeepDropMode::KeepHighest | KeepDropMode::DropHighest => {
            ranked.sort_by(|&a, &b| raw[b].value.cmp(&raw[a].value))
        }
        KeepDropMode::KeepLowest | KeepDropMode::DropLowest => ranked.sort_by_key(|&i| raw[i].value),
    }

    let n = n.min(ranked.len());
    let mut chosen = match mode {
        KeepDropMode::KeepHighest | KeepDropMode::KeepLowest => ranked[..n].to_vec(),
        _ => ranked[n..].to_vec(),
    };
    chosen.sort_unstable();
    chosen.into_iter().map(|i| raw[i].clone()).collect()
}

impl Evaluate for BinaryOperation {
    fn eval(&self, ctx: &mut RollContext<'_>) -> EResult<RollOutcome> {
        let left = self.left.eval(ctx)?;
        let right = self.right.eval(ctx)?;

        let total = apply(self.op, left.total(), right.total())?;
        let average = apply_float(self.op, left.average(), right.average());
        let (minimum, maximum) = bounds(
            self.op,
            (left.minimum(), left.maximum()),
            (right.minimum(), right.maximum()),
        )?;

        let (mut raw, mut kept) = left.into_rolls();
        let (right_raw, right_kept) = right.into_rolls();
        raw.extend(right_raw);
        kept.extend(right_kept);

        Ok(RollOutcome::new(total, minimum, maximum, average, raw, kept))
    }
}

fn apply(op: BinaryOperator, l: Int, r: Int) -> EResult<Int> {
    use BinaryOperator::*;

    let value = match op {
        Add => l.checked_add(r),
        Sub => l.checked_sub(r),
        Mul => l.checked_mul(r),
        Div => {
            if r == 0 {
                return Err(EvalError::DivisionByZero);
            }
            // Truncates toward zero.
            l.checked_div(r)
        }
    };
    value.ok_or(EvalError::Overflow)
}

fn apply_float(op: BinaryOperator, l: Float, r: Float) -> Float {
    use BinaryOperator::*;

    match op {
        Add => l + r,
        Sub => l - r,
        Mul => l * r,
        Div => l / r,
    }
}

fn bounds(op: BinaryOperator, (l_min, l_max): (Int, Int), (r_min, r_max): (Int, Int)) -> EResult<(Int, Int)> {
    use BinaryOperator::*;

    match op {
        Add => Ok((apply(Add, l_min, r_min)?, apply(Add, l_max, r_max)?)),
        Sub => Ok((apply(Sub, l_min, r_max)?, apply(Sub, l_max, r_min)?)),
        Mul => corners(Mul, &[l_min, l_max], &[r_min, r_max]),
        Div => {
            // An interval straddling zero can still divide by -1 or 1.
            if r_min < 0 && r_max > 0 {
                corners(Div, &[l_min, l_max], &[r_min, -1, 1, r_max])
            } else {
                corners(Div, &[l_min, l_max], &[r_min, r_max])
            }
        }
    }
}

fn corners(op: BinaryOperator, lefts: &[Int], rights: &[Int]) -> EResult<(Int, Int)> {
    let mut min = Int::MAX;
    let mut max = Int::MIN;
    for &l in lefts {
        for &r in rights {
            let value = apply(op, l, r)?;
            min = min.min(value);
            max = max.max(value);
        }
    }
    Ok((min, max))
}
