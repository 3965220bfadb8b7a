//! # Price curve
//!
//! Time-based price evaluation over two consecutive stages.
//!
//! | Zone          | Price                                                        |
//! |---------------|--------------------------------------------------------------|
//! | Pending       | restricted start price, or open start price without a restricted stage |
//! | Running       | linear between the current stage's start and end prices      |
//! | Ended         | open end price, or restricted end price without an open stage |
//!
//! While running, the interpolation fraction is `elapsed / sale_duration`
//! where `elapsed` counts from initiation and `sale_duration` covers both
//! stages. Both stages share that single denominator, so with two non-empty
//! stages neither one sweeps its full price range.
//!
//! The curve only needs the stage layout, exposed through [`StagedSale`], so
//! any sale variant can reuse it.

use crate::math::mul_div;
use crate::types::SaleStage;
use crate::Error;

/// Stage layout and price endpoints of a two-stage sale.
pub trait StagedSale {
    fn restricted_duration(&self) -> u64;
    fn open_duration(&self) -> u64;
    /// `(start, end)` prices of the restricted stage.
    fn restricted_prices(&self) -> (u128, u128);
    /// `(start, end)` prices of the open stage.
    fn open_prices(&self) -> (u128, u128);

    fn sale_duration(&self) -> u64 {
        self.restricted_duration()
            .saturating_add(self.open_duration())
    }

    fn has_restricted_stage(&self) -> bool {
        self.restricted_duration() > 0
    }

    fn has_open_stage(&self) -> bool {
        self.open_duration() > 0
    }
}

/// Start and (possibly brought forward) end of an initiated sale.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Timing {
    pub initiated_at: u64,
    pub end_at: u64,
}

/// Classify `now` against the sale window.
pub fn stage_at<S: StagedSale>(sale: &S, timing: Option<Timing>, now: u64) -> SaleStage {
    let timing = match timing {
        Some(timing) => timing,
        None => return SaleStage::Pending,
    };
    if now >= timing.end_at {
        return SaleStage::Ended;
    }
    let elapsed = now.saturating_sub(timing.initiated_at);
    if elapsed < sale.restricted_duration() {
        SaleStage::Restricted
    } else {
        SaleStage::Open
    }
}

/// Price at `now` in any zone.
pub fn price_at<S: StagedSale>(sale: &S, timing: Option<Timing>, now: u64) -> Result<u128, Error> {
    match stage_at(sale, timing, now) {
        SaleStage::Pending => Ok(if sale.has_restricted_stage() {
            sale.restricted_prices().0
        } else {
            sale.open_prices().0
        }),
        SaleStage::Ended => Ok(if sale.has_open_stage() {
            sale.open_prices().1
        } else {
            sale.restricted_prices().1
        }),
        _ => running_price(sale, timing, now),
    }
}

/// Price used to size an allocation; only defined while a stage is running.
pub fn running_price<S: StagedSale>(
    sale: &S,
    timing: Option<Timing>,
    now: u64,
) -> Result<u128, Error> {
    let (start, end) = match stage_at(sale, timing, now) {
        SaleStage::Restricted => sale.restricted_prices(),
        SaleStage::Open => sale.open_prices(),
        _ => return Err(Error::SaleNotActive),
    };
    let initiated_at = timing.map(|t| t.initiated_at).unwrap_or(now);
    interpolate(start, end, now.saturating_sub(initiated_at), sale.sale_duration())
}

fn interpolate(start: u128, end: u128, elapsed: u64, duration: u64) -> Result<u128, Error> {
    if end >= start {
        let delta = mul_div(end - start, elapsed as u128, duration as u128)?;
        start.checked_add(delta).ok_or(Error::ArithmeticOverflow)
    } else {
        let delta = mul_div(start - end, elapsed as u128, duration as u128)?;
        start.checked_sub(delta).ok_or(Error::ArithmeticOverflow)
    }
}
