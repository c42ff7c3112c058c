// ============================================================================
// FORMAL VERIFICATION & PROPERTY-BASED TESTS
// ============================================================================
//
// Run with: cargo test --lib formal_verification
//
// This module implements:
// 1. Ledger invariants over generated fund/withdraw sequences
// 2. Equivalence of the two withdrawal strategies
// 3. Oracle conversion properties (exactness, monotonicity, overflow)
//
// Inputs come from a fixed-seed generator so failures reproduce exactly.
// ============================================================================

#[cfg(test)]
mod formal_tests {
    use crate::constants::*;
    use crate::helpers::oracle::*;
    use crate::state::*;
    use crate::ErrorCode;
    use anchor_lang::error::Error;
    use anchor_lang::prelude::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    const NOW: i64 = 1_700_000_000;
    const SOL: u64 = 1_000_000_000;

    /// Threshold in lamports at the mock price: $50 / $2000
    const MIN_LAMPORTS: u64 = 25_000_000;

    fn new_ledger() -> (FundMe, Pubkey) {
        let owner = Pubkey::new_unique();
        (FundMe::new(owner, Pubkey::new_unique(), MINIMUM_USD, MAX_PRICE_AGE, NOW, 255), owner)
    }

    /// Random contribution, above or below the minimum
    fn amount(rng: &mut StdRng) -> u64 {
        match rng.gen_range(0..4) {
            0 => rng.gen_range(0..MIN_LAMPORTS),
            1 => MIN_LAMPORTS,
            _ => MIN_LAMPORTS + rng.gen_range(0..50 * SOL),
        }
    }

    /// Apply `steps` random contributions from a pool of `pool` funders
    fn populate(rng: &mut StdRng, ledger: &mut FundMe, pool: &[Pubkey], steps: usize) {
        let feed = FixedPrice::mock();
        for _ in 0..steps {
            let funder = pool[rng.gen_range(0..pool.len() as u64) as usize];
            let _ = ledger.fund(funder, amount(rng), &feed, NOW);
        }
    }

    // ========================================================================
    // SECTION 1: LEDGER INVARIANTS
    // ========================================================================

    mod invariants {
        use super::*;

        /// INV-1: Conservation
        /// sum(balances) == total_held after every fund call
        #[test]
        fn inv1_sum_of_balances_equals_total_held() {
            let mut rng = StdRng::seed_from_u64(0x5EED_0001);
            let feed = FixedPrice::mock();

            for _ in 0..50 {
                let (mut ledger, _) = new_ledger();
                let pool: Vec<Pubkey> = (0..1 + rng.gen_range(0..10)).map(|_| Pubkey::new_unique()).collect();
                let mut expected_held: u128 = 0;

                for _ in 0..40 {
                    let funder = pool[rng.gen_range(0..pool.len() as u64) as usize];
                    let lamports = amount(&mut rng);
                    if ledger.fund(funder, lamports, &feed, NOW).is_ok() {
                        expected_held += lamports as u128;
                    }

                    assert_eq!(
                        ledger.sum_of_balances(),
                        ledger.total_held as u128,
                        "INV-1 violated after funding {}",
                        lamports
                    );
                    assert_eq!(ledger.total_held as u128, expected_held);
                }
            }
        }

        /// INV-2: Below-minimum contributions never change the ledger
        #[test]
        fn inv2_below_minimum_rejected_without_effect() {
            let mut rng = StdRng::seed_from_u64(0x5EED_0002);
            let feed = FixedPrice::mock();
            let (mut ledger, _) = new_ledger();
            let pool: Vec<Pubkey> = (0..5).map(|_| Pubkey::new_unique()).collect();
            populate(&mut rng, &mut ledger, &pool, 20);

            for _ in 0..200 {
                let lamports = rng.gen_range(0..MIN_LAMPORTS);
                let before = ledger.clone();

                let result = ledger.fund(pool[0], lamports, &feed, NOW);

                assert_eq!(result.unwrap_err(), Error::from(ErrorCode::InsufficientContribution));
                assert_eq!(ledger, before, "INV-2 violated for {} lamports", lamports);
            }
        }

        /// INV-3: Contributor list is duplicate-free and matches non-zero balances
        #[test]
        fn inv3_list_unique_and_complete() {
            let mut rng = StdRng::seed_from_u64(0x5EED_0003);
            let (mut ledger, _) = new_ledger();
            let pool: Vec<Pubkey> = (0..8).map(|_| Pubkey::new_unique()).collect();
            populate(&mut rng, &mut ledger, &pool, 100);

            let count = ledger.funders_count() as u64;
            for i in 0..count {
                let funder = ledger.funder(i).unwrap();
                assert!(ledger.funder_balance(&funder) >= MIN_LAMPORTS);
                for j in (i + 1)..count {
                    assert_ne!(funder, ledger.funder(j).unwrap(), "duplicate at {} and {}", i, j);
                }
            }
            for key in &pool {
                let listed = (0..count).any(|i| ledger.funder(i).unwrap() == *key);
                assert_eq!(listed, ledger.funder_balance(key) > 0);
            }
        }

        /// INV-4: After any successful withdrawal the epoch is empty
        #[test]
        fn inv4_withdraw_empties_ledger() {
            let mut rng = StdRng::seed_from_u64(0x5EED_0004);

            for round in 0..30 {
                let (mut ledger, owner) = new_ledger();
                let pool: Vec<Pubkey> = (0..1 + rng.gen_range(0..12)).map(|_| Pubkey::new_unique()).collect();
                populate(&mut rng, &mut ledger, &pool, 30);
                let held = ledger.total_held;

                let receipt = if round % 2 == 0 {
                    ledger.withdraw(&owner, |_| Ok(held))
                } else {
                    ledger.cheaper_withdraw(&owner, |_| Ok(held))
                }
                .unwrap();

                assert_eq!(receipt.released, held);
                assert!(ledger.is_empty());
                assert_eq!(ledger.sum_of_balances(), 0);
                assert!(ledger.funder(0).is_err());
                for key in &pool {
                    assert_eq!(ledger.funder_balance(key), 0);
                }
            }
        }

        /// INV-5: Only the owner can withdraw
        #[test]
        fn inv5_owner_gate() {
            let mut rng = StdRng::seed_from_u64(0x5EED_0005);
            let (mut ledger, owner) = new_ledger();
            let pool: Vec<Pubkey> = (0..6).map(|_| Pubkey::new_unique()).collect();
            populate(&mut rng, &mut ledger, &pool, 25);
            let before = ledger.clone();

            let outsider = Pubkey::new_unique();
            for caller in pool.iter().chain(std::iter::once(&outsider)) {
                let plain = ledger.withdraw(caller, |_| Ok(0));
                let cheap = ledger.cheaper_withdraw(caller, |_| Ok(0));
                assert_eq!(plain.unwrap_err(), Error::from(ErrorCode::NotOwner));
                assert_eq!(cheap.unwrap_err(), Error::from(ErrorCode::NotOwner));
                assert_eq!(ledger, before);
            }

            assert!(ledger.withdraw(&owner, |_| Ok(0)).is_ok());
        }

        /// INV-6: Epochs are separated: balances never leak across a withdrawal
        #[test]
        fn inv6_epochs_do_not_leak() {
            let mut rng = StdRng::seed_from_u64(0x5EED_0006);
            let (mut ledger, owner) = new_ledger();
            let pool: Vec<Pubkey> = (0..4).map(|_| Pubkey::new_unique()).collect();

            for epoch in 1..=10u64 {
                populate(&mut rng, &mut ledger, &pool, 15);
                let held = ledger.total_held;
                ledger.withdraw(&owner, |_| Ok(held)).unwrap();
                assert_eq!(ledger.epoch, epoch);
                assert!(ledger.is_empty());
            }
        }
    }

    // ========================================================================
    // SECTION 2: WITHDRAWAL EQUIVALENCE
    // ========================================================================

    mod equivalence {
        use super::*;

        /// EQ-1: withdraw and cheaper_withdraw produce identical ledgers,
        /// receipts and payouts from identical starting states
        #[test]
        fn eq1_same_outcome() {
            let mut rng = StdRng::seed_from_u64(0x5EED_0101);

            for _ in 0..40 {
                let (mut plain, owner) = new_ledger();
                let pool: Vec<Pubkey> = (0..1 + rng.gen_range(0..20)).map(|_| Pubkey::new_unique()).collect();
                let steps = rng.gen_range(0..60) as usize;
                populate(&mut rng, &mut plain, &pool, steps);
                let mut cheap = plain.clone();

                let mut seen_plain = None;
                let mut seen_cheap = None;
                let r1 = plain.withdraw(&owner, |view| {
                    seen_plain = Some(view.clone());
                    Ok(view.total_withdrawn)
                });
                let r2 = cheap.cheaper_withdraw(&owner, |view| {
                    seen_cheap = Some(view.clone());
                    Ok(view.total_withdrawn)
                });

                assert_eq!(r1.unwrap(), r2.unwrap());
                assert_eq!(plain, cheap);
                assert_eq!(seen_plain, seen_cheap, "payout observed different ledgers");
            }
        }

        /// EQ-2: both strategies roll back to the same state on payout failure
        #[test]
        fn eq2_same_rollback() {
            let mut rng = StdRng::seed_from_u64(0x5EED_0102);

            for _ in 0..40 {
                let (mut plain, owner) = new_ledger();
                let pool: Vec<Pubkey> = (0..1 + rng.gen_range(0..20)).map(|_| Pubkey::new_unique()).collect();
                let steps = rng.gen_range(0..60) as usize;
                populate(&mut rng, &mut plain, &pool, steps);
                let before = plain.clone();
                let mut cheap = plain.clone();

                let r1 = plain.withdraw(&owner, |_| err!(ErrorCode::TransferFailure));
                let r2 = cheap.cheaper_withdraw(&owner, |_| err!(ErrorCode::TransferFailure));

                assert_eq!(r1.unwrap_err(), r2.unwrap_err());
                assert_eq!(plain, before);
                assert_eq!(cheap, before);
            }
        }
    }

    // ========================================================================
    // SECTION 3: ORACLE CONVERSION
    // ========================================================================

    mod conversion {
        use super::*;

        /// CONV-1: Exactness at 8 decimals: usd = lamports * answer * 10
        #[test]
        fn conv1_exact_at_mock_precision() {
            let mut rng = StdRng::seed_from_u64(0x5EED_0201);
            let price = FixedPrice::mock().latest_round(NOW);

            for _ in 0..500 {
                let lamports = rng.gen::<u64>();
                let expected = lamports as u128 * MOCK_INITIAL_ANSWER as u128 * 10;
                assert_eq!(convert_to_usd(lamports, &price).unwrap(), expected);
            }
        }

        /// CONV-2: Monotonic in amount and in price
        #[test]
        fn conv2_monotonic() {
            let mut rng = StdRng::seed_from_u64(0x5EED_0202);

            for _ in 0..500 {
                let decimals = rng.gen_range(0..MAX_FEED_DECIMALS as u64 + 1) as u8;
                let answer = 1 + rng.gen_range(0..i64::MAX as u64 / 2) as i64;
                let lamports = rng.gen_range(0..u64::MAX / 2);
                let low = PriceData { answer, decimals, updated_at: NOW };
                let high = PriceData { answer: answer + 1, ..low };

                let (Ok(a), Ok(b), Ok(c)) = (
                    convert_to_usd(lamports, &low),
                    convert_to_usd(lamports + 1, &low),
                    convert_to_usd(lamports, &high),
                ) else {
                    continue;
                };
                assert!(a <= b, "not monotonic in amount");
                assert!(a <= c, "not monotonic in price");
            }
        }

        /// CONV-3: Extreme inputs fail with MathOverflow instead of wrapping
        #[test]
        fn conv3_no_silent_overflow() {
            for decimals in 0..=MAX_FEED_DECIMALS {
                let price = PriceData { answer: i64::MAX, decimals, updated_at: NOW };
                match convert_to_usd(u64::MAX, &price) {
                    Ok(usd) => {
                        let raw = u64::MAX as u128 * i64::MAX as u128;
                        let scale = USD_DECIMALS as i32 - NATIVE_DECIMALS as i32 - decimals as i32;
                        assert!(scale <= 0, "scaled up without overflowing at decimals={}", decimals);
                        assert_eq!(usd, raw / 10u128.pow(scale.unsigned_abs()));
                    }
                    Err(err) => assert_eq!(err, Error::from(ErrorCode::MathOverflow)),
                }
            }
        }

        /// CONV-4: The minimum boundary is exact at the mock price
        #[test]
        fn conv4_threshold_boundary() {
            let price = FixedPrice::mock().latest_round(NOW);
            assert_eq!(convert_to_usd(MIN_LAMPORTS, &price).unwrap(), MINIMUM_USD);
            assert!(convert_to_usd(MIN_LAMPORTS - 1, &price).unwrap() < MINIMUM_USD);
        }
    }
}
