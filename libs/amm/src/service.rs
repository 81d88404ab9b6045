//! Request/response pricing facade
//!
//! Combines a pool snapshot, the calculators and the configured slippage
//! tolerance into the bounded values a ledger submitter needs. Caching,
//! retries and user notifications belong to the caller.

use amm_config::EngineSettings;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::error::{AmmError, Result};
use crate::precision::{from_display, to_display};
use crate::swap::ensure_fee;
use crate::{
    AddLiquidityResult, CpmmPool, LiquidityCalculator, PoolSnapshot, RemoveLiquidityResult,
    SlippageGuard, SwapDirection, SwapResult,
};

/// Exact-input swap request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapQuoteRequest {
    pub pool: PoolSnapshot,
    pub direction: SwapDirection,
    pub amount_in: u64,
    /// Overrides the configured tolerance for this request
    #[serde(default)]
    pub slippage_tolerance_bps: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapQuote {
    pub direction: SwapDirection,
    pub amount_in: u64,
    pub result: SwapResult,
    /// `minAmountOut` for the ledger instruction
    pub min_amount_out: u64,
    pub slippage_tolerance_bps: u32,
}

/// Exact-output swap request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExactOutQuoteRequest {
    pub pool: PoolSnapshot,
    pub direction: SwapDirection,
    pub amount_out: u64,
    #[serde(default)]
    pub slippage_tolerance_bps: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExactOutQuote {
    pub direction: SwapDirection,
    pub amount_out: u64,
    /// Minimal input that delivers `amount_out` against the snapshot
    pub amount_in: u64,
    /// Preview of swapping `amount_in`; its output is at least `amount_out`
    pub result: SwapResult,
    /// `maxAmountIn` for the ledger instruction
    pub max_amount_in: u64,
    pub slippage_tolerance_bps: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddLiquidityRequest {
    pub pool: PoolSnapshot,
    pub amount_yes: u64,
    pub amount_no: u64,
    #[serde(default)]
    pub slippage_tolerance_bps: Option<u32>,
}

/// Deposit preview; `input` is the YES side, `output` the NO side
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddLiquidityQuote {
    pub result: AddLiquidityResult,
    /// `minLpTokens` for the ledger instruction
    pub min_lp_tokens: u64,
    pub slippage_tolerance_bps: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveLiquidityRequest {
    pub pool: PoolSnapshot,
    pub lp_tokens: u64,
    #[serde(default)]
    pub slippage_tolerance_bps: Option<u32>,
}

/// Withdrawal preview; `input` is the YES side, `output` the NO side
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveLiquidityQuote {
    pub result: RemoveLiquidityResult,
    pub min_amount_yes: u64,
    pub min_amount_no: u64,
    pub slippage_tolerance_bps: u32,
}

/// Stateless quoting service over [`EngineSettings`]
#[derive(Debug, Clone)]
pub struct PricingService {
    settings: EngineSettings,
}

impl PricingService {
    pub fn new(settings: EngineSettings) -> Result<Self> {
        ensure_fee(settings.fee_bps)?;
        SlippageGuard::validate_tolerance(settings.slippage_tolerance_bps)?;
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Snapshot priced at the configured fee
    pub fn pool(&self, reserve_yes: u64, reserve_no: u64, total_lp_supply: u64) -> PoolSnapshot {
        PoolSnapshot::new(reserve_yes, reserve_no, total_lp_supply)
            .with_fee_bps(self.settings.fee_bps)
    }

    pub fn quote_swap(&self, request: &SwapQuoteRequest) -> Result<SwapQuote> {
        let outcome = self.tolerance(request.slippage_tolerance_bps).and_then(|tolerance| {
            let result = request.pool.swap_output(request.direction, request.amount_in)?;
            let min_amount_out =
                SlippageGuard::min_output_for_tolerance(result.output_amount, tolerance)?;
            Ok(SwapQuote {
                direction: request.direction,
                amount_in: request.amount_in,
                result,
                min_amount_out,
                slippage_tolerance_bps: tolerance,
            })
        });

        match &outcome {
            Ok(quote) => debug!(
                direction = ?quote.direction,
                amount_in = quote.amount_in,
                amount_out = quote.result.output_amount,
                fee = quote.result.fee_amount,
                price_impact_pct = %quote.result.price_impact_pct,
                min_amount_out = quote.min_amount_out,
                "swap quote"
            ),
            Err(err) => log_rejection("swap", err),
        }
        outcome
    }

    pub fn quote_swap_exact_out(&self, request: &ExactOutQuoteRequest) -> Result<ExactOutQuote> {
        let outcome = self.tolerance(request.slippage_tolerance_bps).and_then(|tolerance| {
            let amount_in = request.pool.swap_input(request.direction, request.amount_out)?;
            let result = request.pool.swap_output(request.direction, amount_in)?;
            if result.output_amount < request.amount_out {
                return Err(AmmError::invariant_violation(format!(
                    "input {} re-quotes to {} below target {}",
                    amount_in, result.output_amount, request.amount_out
                )));
            }
            let max_amount_in = SlippageGuard::max_input_for_tolerance(amount_in, tolerance)?;
            Ok(ExactOutQuote {
                direction: request.direction,
                amount_out: request.amount_out,
                amount_in,
                result,
                max_amount_in,
                slippage_tolerance_bps: tolerance,
            })
        });

        match &outcome {
            Ok(quote) => debug!(
                direction = ?quote.direction,
                amount_out = quote.amount_out,
                amount_in = quote.amount_in,
                max_amount_in = quote.max_amount_in,
                "exact-out swap quote"
            ),
            Err(err) => log_rejection("exact-out swap", err),
        }
        outcome
    }

    pub fn quote_add_liquidity(&self, request: &AddLiquidityRequest) -> Result<AddLiquidityQuote> {
        let outcome = self.tolerance(request.slippage_tolerance_bps).and_then(|tolerance| {
            let pool = &request.pool;
            let result = LiquidityCalculator::compute_add_liquidity(
                request.amount_yes,
                request.amount_no,
                pool.reserve_yes,
                pool.reserve_no,
                pool.total_lp_supply,
            )?;
            let min_lp_tokens =
                SlippageGuard::min_output_for_tolerance(result.lp_tokens_minted, tolerance)?;
            Ok(AddLiquidityQuote {
                result,
                min_lp_tokens,
                slippage_tolerance_bps: tolerance,
            })
        });

        match &outcome {
            Ok(quote) => debug!(
                regime = ?quote.result.regime,
                lp_tokens = quote.result.lp_tokens_minted,
                refund_yes = quote.result.refund_input_amount,
                refund_no = quote.result.refund_output_amount,
                min_lp_tokens = quote.min_lp_tokens,
                "add liquidity quote"
            ),
            Err(err) => log_rejection("add liquidity", err),
        }
        outcome
    }

    pub fn quote_remove_liquidity(
        &self,
        request: &RemoveLiquidityRequest,
    ) -> Result<RemoveLiquidityQuote> {
        let outcome = self.tolerance(request.slippage_tolerance_bps).and_then(|tolerance| {
            let pool = &request.pool;
            let result = LiquidityCalculator::compute_remove_liquidity(
                request.lp_tokens,
                pool.reserve_yes,
                pool.reserve_no,
                pool.total_lp_supply,
            )?;
            Ok(RemoveLiquidityQuote {
                min_amount_yes: SlippageGuard::min_output_for_tolerance(
                    result.input_amount_out,
                    tolerance,
                )?,
                min_amount_no: SlippageGuard::min_output_for_tolerance(
                    result.output_amount_out,
                    tolerance,
                )?,
                result,
                slippage_tolerance_bps: tolerance,
            })
        });

        match &outcome {
            Ok(quote) => debug!(
                lp_tokens = request.lp_tokens,
                amount_yes = quote.result.input_amount_out,
                amount_no = quote.result.output_amount_out,
                share_pct = %quote.result.share_of_pool_pct,
                "remove liquidity quote"
            ),
            Err(err) => log_rejection("remove liquidity", err),
        }
        outcome
    }

    /// Outcome-token amount for display
    pub fn outcome_display(&self, amount: u64) -> Result<Decimal> {
        to_display(amount, self.settings.outcome_decimals)
    }

    /// Parse a displayed outcome-token quantity into native units
    pub fn parse_outcome_amount(&self, value: Decimal) -> Result<u64> {
        from_display(value, self.settings.outcome_decimals)
    }

    /// Base-asset amount for display
    pub fn base_display(&self, amount: u64) -> Result<Decimal> {
        to_display(amount, self.settings.base_decimals)
    }

    /// Parse a displayed base-asset quantity into native units
    pub fn parse_base_amount(&self, value: Decimal) -> Result<u64> {
        from_display(value, self.settings.base_decimals)
    }

    fn tolerance(&self, requested: Option<u32>) -> Result<u32> {
        let tolerance = requested.unwrap_or(self.settings.slippage_tolerance_bps);
        SlippageGuard::validate_tolerance(tolerance)?;
        Ok(tolerance)
    }
}

fn log_rejection(operation: &str, err: &AmmError) {
    if err.is_fatal() {
        error!(operation, error = %err, "quote failed a post-condition");
    } else {
        warn!(operation, error = %err, "quote rejected");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::{LiquidityRegime, MINIMUM_LIQUIDITY};
    use rust_decimal_macros::dec;

    const UNIT: u64 = 1_000_000;

    fn service() -> PricingService {
        PricingService::new(EngineSettings::default()).unwrap()
    }

    #[test_log::test]
    fn test_quote_swap_applies_default_tolerance() {
        let service = service();
        let request = SwapQuoteRequest {
            pool: service.pool(10_000 * UNIT, 10_000 * UNIT, 10_000 * UNIT),
            direction: SwapDirection::YesToNo,
            amount_in: 100 * UNIT,
            slippage_tolerance_bps: None,
        };

        let quote = service.quote_swap(&request).unwrap();
        assert_eq!(quote.result.output_amount, 98_715_803);
        assert_eq!(quote.slippage_tolerance_bps, 50);
        // ceil(98_715_803 * 0.995)
        assert_eq!(quote.min_amount_out, 98_222_224);
        assert!(
            SlippageGuard::is_within_slippage(quote.result.output_amount, quote.min_amount_out, 50)
                .unwrap()
        );
    }

    #[test_log::test]
    fn test_quote_swap_rejects_excessive_override() {
        let service = service();
        let request = SwapQuoteRequest {
            pool: service.pool(10_000, 10_000, 10_000),
            direction: SwapDirection::YesToNo,
            amount_in: 100,
            slippage_tolerance_bps: Some(6_000),
        };

        let err = service.quote_swap(&request).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test_log::test]
    fn test_full_fee_pool_quotes_zero_output() {
        let service = PricingService::new(EngineSettings {
            fee_bps: crate::MAX_FEE_BPS,
            ..EngineSettings::default()
        })
        .unwrap();
        let request = SwapQuoteRequest {
            pool: service.pool(10_000 * UNIT, 10_000 * UNIT, 10_000 * UNIT),
            direction: SwapDirection::YesToNo,
            amount_in: 100 * UNIT,
            slippage_tolerance_bps: None,
        };

        let quote = service.quote_swap(&request).unwrap();
        assert_eq!(quote.result.fee_amount, 100 * UNIT);
        assert_eq!(quote.result.output_amount, 0);
        assert_eq!(quote.result.price_impact_pct, dec!(100));
        assert_eq!(quote.min_amount_out, 0);
    }

    #[test_log::test]
    fn test_exact_out_quote_round_trips() {
        let service = service();
        let request = ExactOutQuoteRequest {
            pool: service.pool(5_000 * UNIT, 20_000 * UNIT, 10_000 * UNIT),
            direction: SwapDirection::NoToYes,
            amount_out: 250 * UNIT,
            slippage_tolerance_bps: Some(100),
        };

        let quote = service.quote_swap_exact_out(&request).unwrap();
        assert!(quote.result.output_amount >= 250 * UNIT);
        assert!(quote.max_amount_in > quote.amount_in);
        assert_eq!(
            quote.max_amount_in,
            SlippageGuard::max_input_for_tolerance(quote.amount_in, 100).unwrap()
        );
    }

    #[test_log::test]
    fn test_exact_out_beyond_reserve() {
        let service = service();
        let request = ExactOutQuoteRequest {
            pool: service.pool(1_000, 1_000, 1_000),
            direction: SwapDirection::YesToNo,
            amount_out: 1_000,
            slippage_tolerance_bps: None,
        };

        let err = service.quote_swap_exact_out(&request).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientLiquidity);
    }

    #[test_log::test]
    fn test_add_liquidity_quote() {
        let service = service();
        let request = AddLiquidityRequest {
            pool: service.pool(0, 0, 0),
            amount_yes: 1_000 * UNIT,
            amount_no: 1_000 * UNIT,
            slippage_tolerance_bps: None,
        };

        let quote = service.quote_add_liquidity(&request).unwrap();
        assert_eq!(quote.result.regime, LiquidityRegime::Bootstrap);
        assert_eq!(quote.result.lp_tokens_minted, 1_000 * UNIT - MINIMUM_LIQUIDITY);
        assert!(quote.min_lp_tokens < quote.result.lp_tokens_minted);
    }

    #[test_log::test]
    fn test_remove_liquidity_quote() {
        let service = service();
        let request = RemoveLiquidityRequest {
            pool: service.pool(1_000 * UNIT, 4_000 * UNIT, 2_000 * UNIT),
            lp_tokens: 200 * UNIT,
            slippage_tolerance_bps: Some(0),
        };

        let quote = service.quote_remove_liquidity(&request).unwrap();
        assert_eq!(quote.result.input_amount_out, 100 * UNIT);
        assert_eq!(quote.result.output_amount_out, 400 * UNIT);
        assert_eq!(quote.min_amount_yes, 100 * UNIT);
        assert_eq!(quote.min_amount_no, 400 * UNIT);
        assert_eq!(quote.result.share_of_pool_pct, dec!(10));
    }

    #[test]
    fn test_rejects_invalid_settings() {
        let settings = EngineSettings {
            slippage_tolerance_bps: 5_001,
            ..EngineSettings::default()
        };
        assert!(PricingService::new(settings).is_err());

        let settings = EngineSettings {
            fee_bps: 10_001,
            ..EngineSettings::default()
        };
        assert!(PricingService::new(settings).is_err());
    }

    #[test]
    fn test_display_conversions() {
        let service = service();
        assert_eq!(service.outcome_display(98_715_803).unwrap(), dec!(98.715803));
        assert_eq!(service.parse_outcome_amount(dec!(100)).unwrap(), 100 * UNIT);
        assert_eq!(service.base_display(150_000_000).unwrap(), dec!(1.5));
        assert_eq!(service.parse_base_amount(dec!(0.00000001)).unwrap(), 1);
    }

    #[test]
    fn test_request_deserializes_from_json() {
        let request: SwapQuoteRequest = serde_json::from_str(
            r#"{
                "pool": {"reserve_yes": 1000000, "reserve_no": 2000000, "total_lp_supply": 1414213, "fee_bps": 100},
                "direction": "YesToNo",
                "amount_in": 10000
            }"#,
        )
        .unwrap();

        assert_eq!(request.pool.fee_bps, 100);
        assert_eq!(request.slippage_tolerance_bps, None);

        let quote = service().quote_swap(&request).unwrap();
        let json = serde_json::to_value(&quote).unwrap();
        assert_eq!(json["amount_in"], 10000);
        assert_eq!(json["direction"], "YesToNo");
    }
}
