use lotto_check::game::{Game, POWER_PLAY_CAP_THRESHOLD_CENTS, Tier};
use lotto_check::lottery::game_source;
use lotto_check::prize::{apply_multiplier, describe_paytable, resolve_prize};

const JACKPOT: &str = "$500 Million";

#[test]
fn every_key_resolves_for_both_games() {
    for game in Game::ALL {
        for count in 0..=5u8 {
            for bonus in [false, true] {
                let prize = resolve_prize(count, bonus, game, JACKPOT);
                assert!(!prize.description.is_empty());
                match prize.tier {
                    Tier::NoPrize => assert_eq!(prize.base_cents, 0),
                    Tier::Jackpot => {
                        assert_eq!(prize.description, JACKPOT);
                        assert_eq!(prize.base_cents, 0);
                    }
                    _ => assert!(prize.base_cents > 0, "{game} {count}+{bonus}"),
                }
            }
        }
    }
}

#[test]
fn two_and_one_without_bonus_pay_nothing() {
    for game in Game::ALL {
        for count in [0u8, 1, 2] {
            let prize = resolve_prize(count, false, game, JACKPOT);
            assert_eq!(prize.tier, Tier::NoPrize);
            assert_eq!(prize.base_cents, 0);
        }
    }
}

#[test]
fn paytables_differ_where_the_games_differ() {
    assert_eq!(resolve_prize(4, true, Game::Powerball, JACKPOT).base_cents, 5_000_000);
    assert_eq!(resolve_prize(4, true, Game::MegaMillions, JACKPOT).base_cents, 1_000_000);
    assert_eq!(resolve_prize(0, true, Game::Powerball, JACKPOT).base_cents, 400);
    assert_eq!(resolve_prize(0, true, Game::MegaMillions, JACKPOT).base_cents, 200);
    assert_eq!(resolve_prize(4, true, Game::Powerball, JACKPOT).description, "$50,000");
}

#[test]
fn power_play_ten_falls_back_at_threshold() {
    let at = apply_multiplier(POWER_PLAY_CAP_THRESHOLD_CENTS, 10, Game::Powerball);
    let two = apply_multiplier(POWER_PLAY_CAP_THRESHOLD_CENTS, 2, Game::Powerball);
    assert_eq!(at.amount_cents, two.amount_cents);
    assert_eq!(at.effective_multiplier, 2);

    let below = POWER_PLAY_CAP_THRESHOLD_CENTS - 1;
    let under = apply_multiplier(below, 10, Game::Powerball);
    assert_eq!(under.amount_cents, below * 10);
    assert_eq!(under.effective_multiplier, 10);
}

#[test]
fn million_dollar_tier_with_ten_pays_two_million() {
    let paid = apply_multiplier(100_000_000, 10, Game::Powerball);
    assert_eq!(paid.amount_cents, 200_000_000);
    assert_eq!(paid.formatted, "$2,000,000.00 (2x)");
}

#[test]
fn other_power_play_values_are_linear() {
    for m in [2u8, 3, 4, 5] {
        let paid = apply_multiplier(100_000_000, m, Game::Powerball);
        assert_eq!(paid.amount_cents, 100_000_000 * u64::from(m));
    }
    let four = apply_multiplier(5_000_000, 4, Game::Powerball);
    assert_eq!(four.amount_cents, 20_000_000);
}

#[test]
fn megaplier_is_linear_for_every_tier() {
    let rules = Game::MegaMillions.rules();
    for entry in rules.paytable.iter() {
        for m in [2u8, 3, 4, 5, 10] {
            let paid = apply_multiplier(entry.base_cents, m, Game::MegaMillions);
            assert_eq!(paid.amount_cents, entry.base_cents * u64::from(m));
            assert_eq!(paid.effective_multiplier, m);
        }
    }
}

#[test]
fn no_multiplier_keeps_base() {
    for game in Game::ALL {
        let paid = apply_multiplier(10_000, 0, game);
        assert_eq!(paid.amount_cents, 10_000);
        assert_eq!(paid.effective_multiplier, 1);
        assert_eq!(paid.formatted, "$100.00");
    }
}

#[test]
fn game_source_delegates_to_engine() {
    let source = game_source(Game::Powerball);
    assert_eq!(source.game(), Game::Powerball);
    assert_eq!(
        source.resolve_prize(3, true, JACKPOT),
        resolve_prize(3, true, Game::Powerball, JACKPOT)
    );
    assert_eq!(source.apply_multiplier(700, 3).amount_cents, 2_100);
}

#[test]
fn paytable_listing_honors_cap() {
    let listing = describe_paytable(Game::Powerball, "Jackpot (varies)");
    assert_eq!(listing.lines.len(), 9);
    assert_eq!(listing.multipliers, vec![2, 3, 4, 5, 10]);
    assert_eq!(listing.lines[0].prize, "Jackpot (varies)");

    let five = &listing.lines[1];
    assert_eq!(five.tier, Tier::Five);
    assert_eq!(five.multiplied.last(), Some(&(10, 200_000_000)));

    let mega = describe_paytable(Game::MegaMillions, "Jackpot (varies)");
    assert_eq!(mega.lines[1].multiplied.last(), Some(&(10, 1_000_000_000)));
}
