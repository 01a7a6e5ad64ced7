use crate::memory::OpponentMemory;
use crate::params::DetectorParams;
use hearts_core::model::card::Card;
use hearts_core::model::player::PlayerPosition;
use hearts_core::model::rank::Rank;
use hearts_core::model::round::RoundState;
use tracing::{Level, event};

/// Infers which opponent of `observer`, if any, is shooting the moon. First
/// matching rule wins.
///
/// `observer` is never reported: an agent's own attempt is tracked by its
/// moon state, not inferred from the table.
pub fn detect(
    round: &RoundState,
    params: &DetectorParams,
    memory: Option<&OpponentMemory>,
    observer: PlayerPosition,
) -> Option<PlayerPosition> {
    let points = round.round_points();
    let detection = points_monopoly(&points, params, observer)
        .map(|seat| (seat, "round_points"))
        .or_else(|| {
            captured_hearts(round, params, observer).map(|seat| (seat, "captured_hearts"))
        })
        .or_else(|| {
            telling_lead(round, &points, params)
                .filter(|&seat| seat != observer)
                .map(|seat| (seat, "telling_lead"))
        })
        .or_else(|| {
            sole_point_holder(round, &points, params)
                .filter(|&seat| seat != observer)
                .map(|seat| (seat, "sole_point_holder"))
        })
        .or_else(|| {
            memory
                .and_then(|memory| behavioral(memory, &points, params, observer))
                .map(|seat| (seat, "behavior"))
        });

    let (seat, rule) = detection?;
    event!(
        target: "hearts_strategy::moon",
        Level::DEBUG,
        observer = %observer,
        shooter = %seat,
        rule,
        points = ?points,
        trick = round.trick_index(),
    );
    Some(seat)
}

fn opponents_scoreless(points: &[u8; 4], seat: PlayerPosition) -> bool {
    seat.others().all(|other| points[other.index()] == 0)
}

fn points_monopoly(
    points: &[u8; 4],
    params: &DetectorParams,
    observer: PlayerPosition,
) -> Option<PlayerPosition> {
    observer.others().find(|&seat| {
        points[seat.index()] >= params.round_points_threshold && opponents_scoreless(points, seat)
    })
}

fn hearts_in(cards: &[Card]) -> usize {
    cards.iter().filter(|card| card.suit.is_heart()).count()
}

fn captured_hearts(
    round: &RoundState,
    params: &DetectorParams,
    observer: PlayerPosition,
) -> Option<PlayerPosition> {
    let captured: Vec<Vec<Card>> = PlayerPosition::LOOP
        .iter()
        .map(|&seat| round.captured_cards(seat))
        .collect();

    observer.others().find(|&seat| {
        let cards = &captured[seat.index()];
        let hearts = hearts_in(cards);
        let has_queen = cards.contains(&Card::QUEEN_OF_SPADES);
        let strong = (hearts >= params.captured_hearts_with_queen && has_queen)
            || hearts >= params.captured_hearts_alone;
        strong
            && seat
                .others()
                .all(|other| hearts_in(&captured[other.index()]) == 0)
    })
}

fn telling_lead(
    round: &RoundState,
    points: &[u8; 4],
    params: &DetectorParams,
) -> Option<PlayerPosition> {
    let trick = round.current_trick();
    let lead = trick.plays().first()?;
    let leader = lead.position;
    if !opponents_scoreless(points, leader) {
        return None;
    }
    if lead.card.is_queen_of_spades() {
        return Some(leader);
    }
    let high_heart = lead.card.suit.is_heart() && lead.card.rank >= Rank::Queen;
    if high_heart && points[leader.index()] >= params.high_heart_lead_min_points {
        return Some(leader);
    }
    None
}

fn sole_point_holder(
    round: &RoundState,
    points: &[u8; 4],
    params: &DetectorParams,
) -> Option<PlayerPosition> {
    let total: u32 = points.iter().map(|&p| u32::from(p)).sum();
    if total == 0 {
        return None;
    }
    let seat = PlayerPosition::LOOP
        .iter()
        .copied()
        .find(|&seat| u32::from(points[seat.index()]) == total)?;

    let cards = round.captured_cards(seat);
    let hearts = hearts_in(&cards);
    let has_queen = cards.contains(&Card::QUEEN_OF_SPADES);
    let convincing = hearts >= params.monopoly_hearts
        || (has_queen && hearts >= params.monopoly_hearts_with_queen)
        || (!has_queen && hearts >= params.monopoly_hearts_without_queen);
    convincing.then_some(seat)
}

fn behavioral(
    memory: &OpponentMemory,
    points: &[u8; 4],
    params: &DetectorParams,
    observer: PlayerPosition,
) -> Option<PlayerPosition> {
    memory
        .suspects()
        .into_iter()
        .filter(|&(seat, _)| seat != observer && opponents_scoreless(points, seat))
        .find(|&(seat, suspicion)| {
            memory.signals(seat).led_queen
                || suspicion >= params.suspicion_flag
                || (suspicion >= params.suspicion_with_points
                    && points[seat.index()] >= params.suspicion_points)
        })
        .map(|(seat, _)| seat)
}

#[cfg(test)]
mod tests {
    use super::detect;
    use crate::memory::OpponentMemory;
    use crate::params::DetectorParams;
    use hearts_core::model::card::Card;
    use hearts_core::model::hand::Hand;
    use hearts_core::model::passing::PassingDirection;
    use hearts_core::model::player::PlayerPosition;
    use hearts_core::model::rank::Rank;
    use hearts_core::model::round::RoundState;
    use hearts_core::model::suit::Suit;
    use hearts_core::model::trick::Trick;

    fn c(rank: Rank, suit: Suit) -> Card {
        Card::new(rank, suit)
    }

    fn trick(leader: PlayerPosition, cards: [Card; 4]) -> Trick {
        let mut seat = leader;
        let mut plays = Vec::new();
        for card in cards {
            plays.push((seat, card));
            seat = seat.next();
        }
        Trick::from_plays(leader, &plays).unwrap()
    }

    fn round_with(history: Vec<Trick>, current: Trick) -> RoundState {
        let hands: [Hand; 4] = Default::default();
        RoundState::from_hands_with_state(
            hands,
            PlayerPosition::North,
            PassingDirection::Hold,
            current,
            history,
            true,
        )
    }

    fn high_leads(leader: PlayerPosition, count: usize) -> Vec<Trick> {
        let leads = [
            (Rank::Ace, Suit::Clubs),
            (Rank::King, Suit::Clubs),
            (Rank::Ace, Suit::Diamonds),
            (Rank::King, Suit::Diamonds),
            (Rank::Queen, Suit::Clubs),
        ];
        let lows = [2, 5, 2, 5, 8];
        leads
            .iter()
            .zip(lows)
            .take(count)
            .map(|(&(rank, suit), low)| {
                let follow = |offset: u8| c(Rank::from_value(low + offset).unwrap(), suit);
                trick(leader, [c(rank, suit), follow(0), follow(1), follow(2)])
            })
            .collect()
    }

    fn remember(tricks: &[Trick]) -> OpponentMemory {
        let mut memory = OpponentMemory::default();
        for (index, trick) in tricks.iter().enumerate() {
            memory.record_trick(trick, index, trick.winner().unwrap());
        }
        memory
    }

    #[test]
    fn no_points_means_no_shooter() {
        let round = round_with(Vec::new(), Trick::new(PlayerPosition::North));
        assert_eq!(
            detect(&round, &DetectorParams::default(), None, PlayerPosition::North),
            None
        );
    }

    #[test]
    fn queen_lead_with_clean_opponents_is_telling() {
        let mut current = Trick::new(PlayerPosition::East);
        current.play(PlayerPosition::East, Card::QUEEN_OF_SPADES).unwrap();
        let round = round_with(Vec::new(), current);
        let params = DetectorParams::default();
        assert_eq!(
            detect(&round, &params, None, PlayerPosition::North),
            Some(PlayerPosition::East)
        );
        assert_eq!(detect(&round, &params, None, PlayerPosition::East), None);
    }

    #[test]
    fn high_heart_lead_needs_points_already_taken() {
        let history = vec![trick(
            PlayerPosition::West,
            [
                c(Rank::Nine, Suit::Hearts),
                c(Rank::Two, Suit::Hearts),
                c(Rank::Three, Suit::Hearts),
                c(Rank::Four, Suit::Hearts),
            ],
        )];
        let params = DetectorParams::default();

        let mut high = Trick::new(PlayerPosition::West);
        high.play(PlayerPosition::West, c(Rank::Ace, Suit::Hearts)).unwrap();
        let round = round_with(history.clone(), high);
        assert_eq!(
            detect(&round, &params, None, PlayerPosition::South),
            Some(PlayerPosition::West)
        );

        let mut low = Trick::new(PlayerPosition::West);
        low.play(PlayerPosition::West, c(Rank::Five, Suit::Hearts)).unwrap();
        let round = round_with(history, low);
        assert_eq!(detect(&round, &params, None, PlayerPosition::South), None);
    }

    #[test]
    fn ten_captured_hearts_flag_even_when_someone_else_took_the_queen() {
        let history = vec![
            trick(
                PlayerPosition::North,
                [
                    c(Rank::Ace, Suit::Hearts),
                    c(Rank::Two, Suit::Hearts),
                    c(Rank::Three, Suit::Hearts),
                    c(Rank::Four, Suit::Hearts),
                ],
            ),
            trick(
                PlayerPosition::North,
                [
                    c(Rank::King, Suit::Hearts),
                    c(Rank::Five, Suit::Hearts),
                    c(Rank::Six, Suit::Hearts),
                    c(Rank::Seven, Suit::Hearts),
                ],
            ),
            trick(
                PlayerPosition::North,
                [
                    c(Rank::Queen, Suit::Hearts),
                    c(Rank::Eight, Suit::Hearts),
                    c(Rank::Two, Suit::Diamonds),
                    c(Rank::Three, Suit::Diamonds),
                ],
            ),
            trick(
                PlayerPosition::East,
                [
                    Card::QUEEN_OF_SPADES,
                    c(Rank::Two, Suit::Spades),
                    c(Rank::Three, Suit::Spades),
                    c(Rank::Four, Suit::Spades),
                ],
            ),
        ];
        let round = round_with(history, Trick::new(PlayerPosition::East));
        assert_eq!(round.round_points(), [10, 13, 0, 0]);

        let params = DetectorParams::default();
        assert_eq!(
            detect(&round, &params, None, PlayerPosition::South),
            Some(PlayerPosition::North)
        );
        assert_eq!(detect(&round, &params, None, PlayerPosition::North), None);
    }

    #[test]
    fn eight_hearts_without_queen_flags_sole_holder() {
        let history = vec![
            trick(
                PlayerPosition::South,
                [
                    c(Rank::Ace, Suit::Hearts),
                    c(Rank::Two, Suit::Hearts),
                    c(Rank::Three, Suit::Hearts),
                    c(Rank::Four, Suit::Hearts),
                ],
            ),
            trick(
                PlayerPosition::South,
                [
                    c(Rank::King, Suit::Hearts),
                    c(Rank::Five, Suit::Hearts),
                    c(Rank::Six, Suit::Hearts),
                    c(Rank::Seven, Suit::Hearts),
                ],
            ),
        ];
        let round = round_with(history, Trick::new(PlayerPosition::South));
        let params = DetectorParams::default();
        assert_eq!(
            detect(&round, &params, None, PlayerPosition::North),
            Some(PlayerPosition::South)
        );
        assert_eq!(detect(&round, &params, None, PlayerPosition::South), None);
    }

    #[test]
    fn behavioral_flag_needs_memory() {
        let led = trick(
            PlayerPosition::West,
            [
                Card::QUEEN_OF_SPADES,
                c(Rank::Two, Suit::Spades),
                c(Rank::Three, Suit::Spades),
                c(Rank::Four, Suit::Spades),
            ],
        );
        let memory = remember(std::slice::from_ref(&led));
        let round = round_with(vec![led], Trick::new(PlayerPosition::West));
        let params = DetectorParams::default();
        // West holds 13 points alone but no hearts, so only behavior can flag them.
        assert_eq!(detect(&round, &params, None, PlayerPosition::North), None);
        assert_eq!(
            detect(&round, &params, Some(&memory), PlayerPosition::North),
            Some(PlayerPosition::West)
        );
        assert_eq!(detect(&round, &params, Some(&memory), PlayerPosition::West), None);
    }

    #[test]
    fn suspicion_alone_flags_at_twenty_five() {
        let params = DetectorParams::default();

        let tricks = high_leads(PlayerPosition::East, 5);
        let memory = remember(&tricks);
        assert_eq!(memory.suspicion(PlayerPosition::East), 25);
        let round = round_with(tricks, Trick::new(PlayerPosition::East));
        assert_eq!(
            detect(&round, &params, Some(&memory), PlayerPosition::South),
            Some(PlayerPosition::East)
        );

        let tricks = high_leads(PlayerPosition::East, 4);
        let memory = remember(&tricks);
        assert_eq!(memory.suspicion(PlayerPosition::East), 20);
        let round = round_with(tricks, Trick::new(PlayerPosition::East));
        assert_eq!(detect(&round, &params, Some(&memory), PlayerPosition::South), None);
    }

    #[test]
    fn moderate_suspicion_flags_once_points_are_taken() {
        let mut tricks = high_leads(PlayerPosition::East, 2);
        tricks.push(trick(
            PlayerPosition::East,
            [
                c(Rank::King, Suit::Spades),
                c(Rank::Two, Suit::Spades),
                Card::QUEEN_OF_SPADES,
                c(Rank::Three, Suit::Spades),
            ],
        ));
        let memory = remember(&tricks);
        assert_eq!(memory.suspicion(PlayerPosition::East), 15);
        let round = round_with(tricks, Trick::new(PlayerPosition::East));
        assert_eq!(round.round_points(), [0, 13, 0, 0]);

        let params = DetectorParams::default();
        assert_eq!(
            detect(&round, &params, Some(&memory), PlayerPosition::South),
            Some(PlayerPosition::East)
        );

        let strict = DetectorParams {
            suspicion_points: 14,
            ..DetectorParams::default()
        };
        assert_eq!(detect(&round, &strict, Some(&memory), PlayerPosition::South), None);
    }
}
