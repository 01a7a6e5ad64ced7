use crate::model::card::Card;
use crate::model::deck::Deck;
use crate::model::hand::Hand;
use crate::model::passing::{PassingDirection, PassingError, PassingState};
use crate::model::player::PlayerPosition;
use crate::model::suit::Suit;
use crate::model::trick::{Trick, TrickError};
use crate::rules;
use std::fmt;

pub const TRICKS_PER_ROUND: usize = 13;

#[derive(Debug, Clone)]
pub struct RoundState {
    hands: [Hand; 4],
    current_trick: Trick,
    trick_history: Vec<Trick>,
    starting_player: PlayerPosition,
    passing_direction: PassingDirection,
    phase: RoundPhase,
    hearts_broken: bool,
}

#[derive(Debug, Clone)]
pub enum RoundPhase {
    Passing(PassingState),
    Playing,
}

impl RoundState {
    pub fn deal(
        deck: &Deck,
        starting_player: PlayerPosition,
        passing_direction: PassingDirection,
    ) -> Self {
        let mut hands: [Hand; 4] = Default::default();
        for (index, card) in deck.cards().iter().enumerate() {
            hands[index % 4].add(*card);
        }

        let starting_player = holder_of_two_of_clubs(&hands).unwrap_or(starting_player);
        let phase = if passing_direction.requires_selection() {
            RoundPhase::Passing(PassingState::new(passing_direction))
        } else {
            RoundPhase::Playing
        };

        Self {
            hands,
            current_trick: Trick::new(starting_player),
            trick_history: Vec::new(),
            starting_player,
            passing_direction,
            phase,
            hearts_broken: false,
        }
    }

    /// Rebuilds a mid-round position, e.g. for scenario tests or replay.
    pub fn from_hands_with_state(
        hands: [Hand; 4],
        starting_player: PlayerPosition,
        passing_direction: PassingDirection,
        current_trick: Trick,
        trick_history: Vec<Trick>,
        hearts_broken: bool,
    ) -> Self {
        Self {
            hands,
            current_trick,
            trick_history,
            starting_player,
            passing_direction,
            phase: RoundPhase::Playing,
            hearts_broken,
        }
    }

    pub fn passing_direction(&self) -> PassingDirection {
        self.passing_direction
    }

    pub fn phase(&self) -> &RoundPhase {
        &self.phase
    }

    pub fn hand(&self, seat: PlayerPosition) -> &Hand {
        &self.hands[seat.index()]
    }

    pub fn current_trick(&self) -> &Trick {
        &self.current_trick
    }

    pub fn trick_history(&self) -> &[Trick] {
        &self.trick_history
    }

    pub fn starting_player(&self) -> PlayerPosition {
        self.starting_player
    }

    pub fn tricks_completed(&self) -> usize {
        self.trick_history.len()
    }

    /// Zero-based index of the trick currently being played.
    pub fn trick_index(&self) -> usize {
        self.trick_history.len()
    }

    pub fn is_complete(&self) -> bool {
        self.trick_history.len() == TRICKS_PER_ROUND
    }

    pub fn hearts_broken(&self) -> bool {
        self.hearts_broken
    }

    pub fn submit_pass(
        &mut self,
        seat: PlayerPosition,
        cards: [Card; 3],
    ) -> Result<(), PassingError> {
        match &mut self.phase {
            RoundPhase::Passing(state) => state.submit(seat, cards, &mut self.hands[seat.index()]),
            RoundPhase::Playing => Err(PassingError::NotInPassingPhase),
        }
    }

    pub fn resolve_passes(&mut self) -> Result<(), PassingError> {
        let state = match &self.phase {
            RoundPhase::Passing(state) => state.clone(),
            RoundPhase::Playing => return Err(PassingError::NotInPassingPhase),
        };

        state.apply(&mut self.hands)?;
        // The two of clubs may have changed hands.
        if let Some(leader) = holder_of_two_of_clubs(&self.hands) {
            self.starting_player = leader;
            self.current_trick = Trick::new(leader);
        }
        self.phase = RoundPhase::Playing;
        Ok(())
    }

    /// Cards won by `seat` in completed tricks.
    pub fn captured_cards(&self, seat: PlayerPosition) -> Vec<Card> {
        self.trick_history
            .iter()
            .filter(|trick| trick.winner() == Some(seat))
            .flat_map(|trick| trick.plays().iter().map(|play| play.card))
            .collect()
    }

    /// Penalty points taken this round, attributed to each trick's winner.
    pub fn round_points(&self) -> [u8; 4] {
        let mut totals = [0u8; 4];
        for trick in &self.trick_history {
            if let Some(winner) = trick.winner() {
                let idx = winner.index();
                totals[idx] = totals[idx].saturating_add(trick.penalty_total());
            }
        }
        totals
    }

    pub fn legal_cards(&self, seat: PlayerPosition) -> Vec<Card> {
        rules::valid_cards(
            self.hands[seat.index()].cards(),
            &self.current_trick,
            self.hearts_broken,
            rules::is_first_trick(self),
        )
    }

    pub fn play_card(
        &mut self,
        seat: PlayerPosition,
        card: Card,
    ) -> Result<PlayOutcome, PlayError> {
        if !matches!(self.phase, RoundPhase::Playing) {
            return Err(PlayError::NotInPlayPhase);
        }

        let hand = &self.hands[seat.index()];
        if !hand.contains(card) {
            return Err(PlayError::CardNotInHand(card));
        }

        let expected = self.current_trick.next_to_play();
        if expected != seat {
            return Err(PlayError::OutOfTurn {
                expected,
                actual: seat,
            });
        }

        if !self.legal_cards(seat).contains(&card) {
            return Err(self.explain_illegal(seat, card));
        }

        self.hands[seat.index()].remove(card);
        if card.suit.is_heart() {
            self.hearts_broken = true;
        }
        self.current_trick.play(seat, card).map_err(PlayError::Trick)?;

        match self.current_trick.winner() {
            Some(winner) => {
                let penalties = self.current_trick.penalty_total();
                let finished = std::mem::replace(&mut self.current_trick, Trick::new(winner));
                self.trick_history.push(finished);
                Ok(PlayOutcome::TrickCompleted { winner, penalties })
            }
            None => Ok(PlayOutcome::Played),
        }
    }

    fn explain_illegal(&self, seat: PlayerPosition, card: Card) -> PlayError {
        let hand = &self.hands[seat.index()];
        match self.current_trick.lead_suit() {
            None if rules::is_first_trick(self) && hand.contains(Card::TWO_OF_CLUBS) => {
                PlayError::MustLeadTwoOfClubs
            }
            None => PlayError::HeartsNotBroken,
            Some(lead) if card.suit != lead && hand.has_suit(lead) => {
                PlayError::MustFollowSuit(lead)
            }
            Some(_) => PlayError::NoPointsOnFirstTrick,
        }
    }
}

fn holder_of_two_of_clubs(hands: &[Hand; 4]) -> Option<PlayerPosition> {
    PlayerPosition::LOOP
        .iter()
        .copied()
        .find(|seat| hands[seat.index()].contains(Card::TWO_OF_CLUBS))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    Played,
    TrickCompleted { winner: PlayerPosition, penalties: u8 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayError {
    NotInPlayPhase,
    CardNotInHand(Card),
    OutOfTurn {
        expected: PlayerPosition,
        actual: PlayerPosition,
    },
    MustLeadTwoOfClubs,
    MustFollowSuit(Suit),
    HeartsNotBroken,
    NoPointsOnFirstTrick,
    Trick(TrickError),
}

impl fmt::Display for PlayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayError::NotInPlayPhase => write!(f, "round is not in the playing phase"),
            PlayError::CardNotInHand(card) => write!(f, "{card} is not in hand"),
            PlayError::OutOfTurn { expected, actual } => {
                write!(f, "expected {expected} to play but got {actual}")
            }
            PlayError::MustLeadTwoOfClubs => write!(f, "the first lead must be the two of clubs"),
            PlayError::MustFollowSuit(suit) => write!(f, "must follow {suit}"),
            PlayError::HeartsNotBroken => write!(f, "hearts have not been broken"),
            PlayError::NoPointsOnFirstTrick => write!(f, "no points on the first trick"),
            PlayError::Trick(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for PlayError {}

#[cfg(test)]
mod tests {
    use super::{PlayError, PlayOutcome, RoundPhase, RoundState};
    use crate::model::card::Card;
    use crate::model::deck::Deck;
    use crate::model::hand::Hand;
    use crate::model::passing::PassingDirection;
    use crate::model::player::PlayerPosition;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;
    use crate::model::trick::Trick;

    #[test]
    fn dealing_gives_thirteen_cards_and_two_of_clubs_leads() {
        let deck = Deck::shuffled_with_seed(99);
        let round = RoundState::deal(&deck, PlayerPosition::North, PassingDirection::Left);
        for seat in PlayerPosition::LOOP {
            assert_eq!(round.hand(seat).len(), 13, "{seat} should have 13 cards");
        }
        assert!(matches!(round.phase(), RoundPhase::Passing(_)));
        let leader = round.current_trick().leader();
        assert!(round.hand(leader).contains(Card::TWO_OF_CLUBS));
    }

    #[test]
    fn passing_flow_moves_cards_and_enters_play_phase() {
        let deck = Deck::standard();
        let mut round = RoundState::deal(&deck, PlayerPosition::North, PassingDirection::Left);
        for seat in PlayerPosition::LOOP {
            let hand = round.hand(seat);
            let cards = [hand.cards()[10], hand.cards()[11], hand.cards()[12]];
            round.submit_pass(seat, cards).unwrap();
        }
        round.resolve_passes().unwrap();
        assert!(matches!(round.phase(), RoundPhase::Playing));
        for seat in PlayerPosition::LOOP {
            assert_eq!(round.hand(seat).len(), 13);
        }
    }

    #[test]
    fn round_points_follow_the_trick_winner() {
        let trick = Trick::from_plays(
            PlayerPosition::North,
            &[
                (PlayerPosition::North, Card::new(Rank::Ace, Suit::Spades)),
                (PlayerPosition::East, Card::QUEEN_OF_SPADES),
                (PlayerPosition::South, Card::new(Rank::Three, Suit::Hearts)),
                (PlayerPosition::West, Card::new(Rank::Four, Suit::Spades)),
            ],
        )
        .unwrap();
        let round = RoundState::from_hands_with_state(
            Default::default(),
            PlayerPosition::North,
            PassingDirection::Hold,
            Trick::new(PlayerPosition::North),
            vec![trick],
            true,
        );
        assert_eq!(round.round_points(), [14, 0, 0, 0]);
        assert_eq!(round.captured_cards(PlayerPosition::North).len(), 4);
        assert!(round.captured_cards(PlayerPosition::East).is_empty());
        assert_eq!(round.trick_index(), 1);
    }

    #[test]
    fn first_lead_must_be_two_of_clubs() {
        let deck = Deck::standard();
        let mut round = RoundState::deal(&deck, PlayerPosition::North, PassingDirection::Hold);
        let leader = round.current_trick().leader();
        let wrong = round
            .hand(leader)
            .iter()
            .copied()
            .find(|&c| c != Card::TWO_OF_CLUBS)
            .unwrap();
        assert_eq!(
            round.play_card(leader, wrong),
            Err(PlayError::MustLeadTwoOfClubs)
        );
        assert_eq!(
            round.play_card(leader, Card::TWO_OF_CLUBS),
            Ok(PlayOutcome::Played)
        );
    }

    #[test]
    fn follow_suit_is_enforced() {
        let hands = [
            Hand::with_cards(vec![Card::new(Rank::Nine, Suit::Clubs)]),
            Hand::with_cards(vec![
                Card::new(Rank::Three, Suit::Clubs),
                Card::new(Rank::Two, Suit::Diamonds),
            ]),
            Hand::new(),
            Hand::new(),
        ];
        let seed = Trick::from_plays(
            PlayerPosition::North,
            &[
                (PlayerPosition::North, Card::TWO_OF_CLUBS),
                (PlayerPosition::East, Card::new(Rank::Four, Suit::Clubs)),
                (PlayerPosition::South, Card::new(Rank::Five, Suit::Clubs)),
                (PlayerPosition::West, Card::new(Rank::Six, Suit::Clubs)),
            ],
        )
        .unwrap();
        let mut round = RoundState::from_hands_with_state(
            hands,
            PlayerPosition::North,
            PassingDirection::Hold,
            Trick::new(PlayerPosition::North),
            vec![seed],
            false,
        );
        round
            .play_card(PlayerPosition::North, Card::new(Rank::Nine, Suit::Clubs))
            .unwrap();
        assert_eq!(
            round.play_card(PlayerPosition::East, Card::new(Rank::Two, Suit::Diamonds)),
            Err(PlayError::MustFollowSuit(Suit::Clubs))
        );
    }
}
