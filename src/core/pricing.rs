use crate::core::defaults::fallback_pricing;
use crate::core::round_to;
use crate::domain::model::{LessonPackage, PricingBreakdown, PricingCustomization};
use crate::domain::ports::Calculator;
use crate::utils::error::{Result, StatsError};

#[derive(Debug, Clone, Copy)]
pub struct PricingInput<'a> {
    pub package: &'a LessonPackage,
    pub customization: Option<&'a PricingCustomization>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PricingCalculator;

impl PricingCalculator {
    pub fn new() -> Self {
        Self
    }

    /// `final = base - base * discount / 100`, per-lesson cost only when sessions are known.
    pub fn price(
        &self,
        package_id: &str,
        base_price: f64,
        discount_percent: f64,
        sessions: Option<u32>,
    ) -> Result<PricingBreakdown> {
        if !base_price.is_finite() || base_price < 0.0 {
            return Err(StatsError::computation(
                self.name(),
                format!("package '{}' has invalid price {}", package_id, base_price),
            ));
        }
        if !(0.0..=100.0).contains(&discount_percent) {
            return Err(StatsError::computation(
                self.name(),
                format!("discount {} is outside 0..=100", discount_percent),
            ));
        }

        let discount = base_price * discount_percent / 100.0;
        let final_price = round_to(base_price - discount, 2);
        let sessions = sessions.filter(|s| *s > 0);

        Ok(PricingBreakdown {
            package_id: package_id.to_string(),
            base_price,
            discount_percent,
            discount_amount: round_to(discount, 2),
            final_price,
            sessions,
            per_lesson_cost: sessions.map(|s| round_to(final_price / f64::from(s), 2)),
        })
    }
}

impl Calculator for PricingCalculator {
    type Input<'a> = PricingInput<'a>;
    type Output = PricingBreakdown;

    fn name(&self) -> &'static str {
        "PricingCalculator"
    }

    fn calculate(&self, input: PricingInput<'_>) -> Result<PricingBreakdown> {
        let discount = input.customization.map(|c| c.discount_percent).unwrap_or(0.0);
        self.price(
            &input.package.id,
            input.package.price,
            discount,
            Some(input.package.sessions),
        )
    }

    fn fallback(&self, input: PricingInput<'_>) -> PricingBreakdown {
        fallback_pricing(&input.package.id)
    }
}
