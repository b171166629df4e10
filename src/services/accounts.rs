//! Users, role assignments, and the records created under each role
//!
//! A user holds at most one role assignment of each kind. Domain objects
//! (reviews, tickets, payment cards, coupons) hang off the Customer role;
//! censoring references hang off the Moderator role; theater management and
//! trainee mentoring hang off the Admin role. All wiring here is
//! bidirectional so the cascade hooks can tear it down from either side.

use crate::domain::entities::{Address, Coupon, PaymentCard, Review, RoleAssignment, RoleData, User};
use crate::domain::types::{
    AddressId, CouponId, MovieId, PaymentCardId, ReviewId, RoleId, RoleKind, TheaterId, UserId,
};
use crate::domain::{CoreError, CoreResult};
use crate::store::Graph;
use tracing::info;

pub fn register_user(graph: &mut Graph, email: &str) -> CoreResult<UserId> {
    if graph.users.values().any(|user| user.email == email) {
        return Err(CoreError::AlreadyExists(format!("user with email {email}")));
    }
    let id = UserId(graph.fresh_id());
    graph.users.insert(id, User::new(id, email));
    info!(user_id = %id, email = %email, "user_registered");
    Ok(id)
}

/// Grant a role assignment to a user; at most one per kind.
pub fn grant_role(graph: &mut Graph, user_id: UserId, kind: RoleKind) -> CoreResult<RoleId> {
    let user = graph.user(user_id)?;
    if user.roles.contains_key(&kind) {
        return Err(CoreError::AlreadyExists(format!(
            "{} role for user {user_id}",
            kind.as_str()
        )));
    }
    let role_id = RoleId(graph.fresh_id());
    graph.roles.insert(
        role_id,
        RoleAssignment {
            id: role_id,
            user: Some(user_id),
            data: RoleData::empty(kind),
        },
    );
    graph.user_mut(user_id)?.roles.insert(kind, role_id);
    info!(user_id = %user_id, role_id = %role_id, kind = %kind.as_str(), "role_granted");
    Ok(role_id)
}

/// The user's role assignment of the given kind, if granted.
pub fn role_of(graph: &Graph, user_id: UserId, kind: RoleKind) -> CoreResult<Option<RoleId>> {
    Ok(graph.user(user_id)?.roles.get(&kind).copied())
}

fn require_kind(graph: &Graph, role_id: RoleId, kind: RoleKind) -> CoreResult<()> {
    let role = graph.role(role_id)?;
    if role.kind() != kind {
        return Err(CoreError::InvalidState(format!(
            "role {role_id} is {}, expected {}",
            role.kind().as_str(),
            kind.as_str()
        )));
    }
    Ok(())
}

pub fn write_review(
    graph: &mut Graph,
    writer: RoleId,
    movie_id: MovieId,
    rating: u8,
    text: &str,
) -> CoreResult<ReviewId> {
    require_kind(graph, writer, RoleKind::Customer)?;
    graph.movie(movie_id)?;

    let id = ReviewId(graph.fresh_id());
    graph.reviews.insert(
        id,
        Review {
            id,
            writer: Some(writer),
            movie: Some(movie_id),
            rating,
            text: text.to_string(),
            censored: false,
            censored_by: None,
        },
    );
    graph.movie_mut(movie_id)?.reviews.insert(id);
    if let RoleData::Customer { reviews, .. } = &mut graph.role_mut(writer)?.data {
        reviews.insert(id);
    }
    info!(review_id = %id, movie_id = %movie_id, writer = %writer, rating = %rating, "review_written");
    Ok(id)
}

/// Billing address fields for a new payment card.
#[derive(Debug, Clone)]
pub struct AddressDetails {
    pub street: String,
    pub city: String,
    pub us_state: String,
    pub zipcode: String,
}

/// Add a payment card under a customer role, with its owned billing address.
pub fn add_payment_card(
    graph: &mut Graph,
    owner: RoleId,
    last_four: &str,
    expiry: &str,
    billing: AddressDetails,
) -> CoreResult<PaymentCardId> {
    require_kind(graph, owner, RoleKind::Customer)?;

    let card_id = PaymentCardId(graph.fresh_id());
    let address_id = AddressId(graph.fresh_id());
    graph.addresses.insert(
        address_id,
        Address {
            id: address_id,
            card: Some(card_id),
            street: billing.street,
            city: billing.city,
            us_state: billing.us_state,
            zipcode: billing.zipcode,
        },
    );
    graph.payment_cards.insert(
        card_id,
        PaymentCard {
            id: card_id,
            owner: Some(owner),
            address: Some(address_id),
            last_four: last_four.to_string(),
            expiry: expiry.to_string(),
            tickets: Default::default(),
        },
    );
    if let RoleData::Customer { payment_cards, .. } = &mut graph.role_mut(owner)?.data {
        payment_cards.insert(card_id);
    }
    info!(card_id = %card_id, owner = %owner, "payment_card_added");
    Ok(card_id)
}

pub fn issue_coupon(graph: &mut Graph, owner: RoleId, description: &str) -> CoreResult<CouponId> {
    require_kind(graph, owner, RoleKind::Customer)?;
    let id = CouponId(graph.fresh_id());
    graph.coupons.insert(
        id,
        Coupon {
            id,
            owner: Some(owner),
            description: description.to_string(),
        },
    );
    if let RoleData::Customer { coupons, .. } = &mut graph.role_mut(owner)?.data {
        coupons.insert(id);
    }
    info!(coupon_id = %id, owner = %owner, "coupon_issued");
    Ok(id)
}

/// Mark a review censored and record the censoring moderator on both sides.
/// Re-censoring moves the reference: the previous moderator is detached first.
pub fn censor_review(graph: &mut Graph, moderator: RoleId, review_id: ReviewId) -> CoreResult<()> {
    require_kind(graph, moderator, RoleKind::Moderator)?;
    if let Some(previous) = graph.review(review_id)?.censored_by {
        if previous != moderator {
            if let RoleData::Moderator { censored_reviews, .. } =
                &mut graph.role_mut(previous)?.data
            {
                censored_reviews.remove(&review_id);
            }
        }
    }
    let review = graph.review_mut(review_id)?;
    review.censored = true;
    review.censored_by = Some(moderator);
    if let RoleData::Moderator { censored_reviews, .. } = &mut graph.role_mut(moderator)?.data {
        censored_reviews.insert(review_id);
    }
    info!(review_id = %review_id, moderator = %moderator, "review_censored");
    Ok(())
}

pub fn censor_user(graph: &mut Graph, moderator: RoleId, user_id: UserId) -> CoreResult<()> {
    require_kind(graph, moderator, RoleKind::Moderator)?;
    if let Some(previous) = graph.user(user_id)?.censored_by {
        if previous != moderator {
            if let RoleData::Moderator { censored_users, .. } = &mut graph.role_mut(previous)?.data
            {
                censored_users.remove(&user_id);
            }
        }
    }
    graph.user_mut(user_id)?.censored_by = Some(moderator);
    if let RoleData::Moderator { censored_users, .. } = &mut graph.role_mut(moderator)?.data {
        censored_users.insert(user_id);
    }
    info!(user_id = %user_id, moderator = %moderator, "user_censored");
    Ok(())
}

/// Put a trainee under an admin mentor, both directions. Re-mentoring moves
/// the reference: the previous mentor's trainee set is detached first.
pub fn assign_mentor(graph: &mut Graph, admin: RoleId, trainee: RoleId) -> CoreResult<()> {
    require_kind(graph, admin, RoleKind::Admin)?;
    require_kind(graph, trainee, RoleKind::AdminTrainee)?;
    if let RoleData::AdminTrainee { mentor: Some(previous) } = &graph.role(trainee)?.data {
        let previous = *previous;
        if previous != admin {
            if let RoleData::Admin { trainees, .. } = &mut graph.role_mut(previous)?.data {
                trainees.remove(&trainee);
            }
        }
    }
    if let RoleData::AdminTrainee { mentor } = &mut graph.role_mut(trainee)?.data {
        *mentor = Some(admin);
    }
    if let RoleData::Admin { trainees, .. } = &mut graph.role_mut(admin)?.data {
        trainees.insert(trainee);
    }
    info!(admin = %admin, trainee = %trainee, "mentor_assigned");
    Ok(())
}

/// Put a theater under an admin's management, both directions.
pub fn assign_theater(graph: &mut Graph, admin: RoleId, theater_id: TheaterId) -> CoreResult<()> {
    require_kind(graph, admin, RoleKind::Admin)?;
    graph.theater_mut(theater_id)?.admins.insert(admin);
    if let RoleData::Admin { theaters, .. } = &mut graph.role_mut(admin)?.data {
        theaters.insert(theater_id);
    }
    info!(admin = %admin, theater_id = %theater_id, "theater_assigned");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::Runtime;
    use crate::services::inventory;

    #[test]
    fn test_register_and_duplicate_email() {
        let mut graph = Graph::default();
        register_user(&mut graph, "ada@example.com").unwrap();
        let err = register_user(&mut graph, "ada@example.com").unwrap_err();
        assert!(matches!(err, CoreError::AlreadyExists(_)));
    }

    #[test]
    fn test_grant_role_once_per_kind() {
        let mut graph = Graph::default();
        let user = register_user(&mut graph, "ada@example.com").unwrap();

        let customer = grant_role(&mut graph, user, RoleKind::Customer).unwrap();
        assert_eq!(role_of(&graph, user, RoleKind::Customer).unwrap(), Some(customer));

        let err = grant_role(&mut graph, user, RoleKind::Customer).unwrap_err();
        assert!(matches!(err, CoreError::AlreadyExists(_)));

        // a different kind is fine
        grant_role(&mut graph, user, RoleKind::Moderator).unwrap();
    }

    #[test]
    fn test_review_wired_both_ways() {
        let mut graph = Graph::default();
        let movie = inventory::add_movie(&mut graph, "Dune", Runtime::new(2, 35));
        let user = register_user(&mut graph, "ada@example.com").unwrap();
        let customer = grant_role(&mut graph, user, RoleKind::Customer).unwrap();

        let review = write_review(&mut graph, customer, movie, 9, "slow but great").unwrap();

        assert!(graph.movie(movie).unwrap().reviews.contains(&review));
        match &graph.role(customer).unwrap().data {
            RoleData::Customer { reviews, .. } => assert!(reviews.contains(&review)),
            other => panic!("unexpected role data: {other:?}"),
        }
    }

    #[test]
    fn test_write_review_requires_customer() {
        let mut graph = Graph::default();
        let movie = inventory::add_movie(&mut graph, "Dune", Runtime::new(2, 35));
        let user = register_user(&mut graph, "mod@example.com").unwrap();
        let moderator = grant_role(&mut graph, user, RoleKind::Moderator).unwrap();

        let err = write_review(&mut graph, moderator, movie, 1, "no").unwrap_err();
        assert!(matches!(err, CoreError::InvalidState(_)));
    }

    #[test]
    fn test_payment_card_owns_address() {
        let mut graph = Graph::default();
        let user = register_user(&mut graph, "ada@example.com").unwrap();
        let customer = grant_role(&mut graph, user, RoleKind::Customer).unwrap();

        let card = add_payment_card(
            &mut graph,
            customer,
            "4242",
            "12/28",
            AddressDetails {
                street: "1 Main St".into(),
                city: "Atlanta".into(),
                us_state: "GA".into(),
                zipcode: "30301".into(),
            },
        )
        .unwrap();

        let address = graph.payment_card(card).unwrap().address.unwrap();
        assert_eq!(graph.address(address).unwrap().card, Some(card));
    }

    #[test]
    fn test_censor_review() {
        let mut graph = Graph::default();
        let movie = inventory::add_movie(&mut graph, "Dune", Runtime::new(2, 35));
        let writer_user = register_user(&mut graph, "ada@example.com").unwrap();
        let customer = grant_role(&mut graph, writer_user, RoleKind::Customer).unwrap();
        let review = write_review(&mut graph, customer, movie, 2, "spam").unwrap();

        let mod_user = register_user(&mut graph, "mod@example.com").unwrap();
        let moderator = grant_role(&mut graph, mod_user, RoleKind::Moderator).unwrap();

        censor_review(&mut graph, moderator, review).unwrap();

        let censored = graph.review(review).unwrap();
        assert!(censored.censored);
        assert_eq!(censored.censored_by, Some(moderator));
    }

    #[test]
    fn test_recensor_moves_reference_between_moderators() {
        let mut graph = Graph::default();
        let movie = inventory::add_movie(&mut graph, "Dune", Runtime::new(2, 35));
        let writer_user = register_user(&mut graph, "ada@example.com").unwrap();
        let customer = grant_role(&mut graph, writer_user, RoleKind::Customer).unwrap();
        let review = write_review(&mut graph, customer, movie, 2, "spam").unwrap();
        let first_user = register_user(&mut graph, "mod1@example.com").unwrap();
        let first = grant_role(&mut graph, first_user, RoleKind::Moderator).unwrap();
        let second_user = register_user(&mut graph, "mod2@example.com").unwrap();
        let second = grant_role(&mut graph, second_user, RoleKind::Moderator).unwrap();

        censor_review(&mut graph, first, review).unwrap();
        censor_user(&mut graph, first, writer_user).unwrap();
        censor_review(&mut graph, second, review).unwrap();
        censor_user(&mut graph, second, writer_user).unwrap();

        // only the second moderator holds the references now
        match &graph.role(first).unwrap().data {
            RoleData::Moderator { censored_reviews, censored_users } => {
                assert!(censored_reviews.is_empty());
                assert!(censored_users.is_empty());
            }
            other => panic!("unexpected role data: {other:?}"),
        }
        assert_eq!(graph.review(review).unwrap().censored_by, Some(second));
        assert_eq!(graph.user(writer_user).unwrap().censored_by, Some(second));
    }

    #[test]
    fn test_remmentor_moves_reference_between_admins() {
        let mut graph = Graph::default();
        let first_user = register_user(&mut graph, "admin1@example.com").unwrap();
        let first = grant_role(&mut graph, first_user, RoleKind::Admin).unwrap();
        let second_user = register_user(&mut graph, "admin2@example.com").unwrap();
        let second = grant_role(&mut graph, second_user, RoleKind::Admin).unwrap();
        let trainee_user = register_user(&mut graph, "trainee@example.com").unwrap();
        let trainee = grant_role(&mut graph, trainee_user, RoleKind::AdminTrainee).unwrap();

        assign_mentor(&mut graph, first, trainee).unwrap();
        assign_mentor(&mut graph, second, trainee).unwrap();

        match &graph.role(first).unwrap().data {
            RoleData::Admin { trainees, .. } => assert!(trainees.is_empty()),
            other => panic!("unexpected role data: {other:?}"),
        }
        match &graph.role(second).unwrap().data {
            RoleData::Admin { trainees, .. } => assert!(trainees.contains(&trainee)),
            other => panic!("unexpected role data: {other:?}"),
        }
        match &graph.role(trainee).unwrap().data {
            RoleData::AdminTrainee { mentor } => assert_eq!(*mentor, Some(second)),
            other => panic!("unexpected role data: {other:?}"),
        }
    }

    #[test]
    fn test_mentor_and_theater_assignment() {
        let mut graph = Graph::default();
        let theater = inventory::add_theater(&mut graph, "Downtown");
        let admin_user = register_user(&mut graph, "admin@example.com").unwrap();
        let admin = grant_role(&mut graph, admin_user, RoleKind::Admin).unwrap();
        let trainee_user = register_user(&mut graph, "trainee@example.com").unwrap();
        let trainee = grant_role(&mut graph, trainee_user, RoleKind::AdminTrainee).unwrap();

        assign_mentor(&mut graph, admin, trainee).unwrap();
        assign_theater(&mut graph, admin, theater).unwrap();

        match &graph.role(trainee).unwrap().data {
            RoleData::AdminTrainee { mentor } => assert_eq!(*mentor, Some(admin)),
            other => panic!("unexpected role data: {other:?}"),
        }
        match &graph.role(admin).unwrap().data {
            RoleData::Admin { theaters, trainees } => {
                assert!(theaters.contains(&theater));
                assert!(trainees.contains(&trainee));
            }
            other => panic!("unexpected role data: {other:?}"),
        }
        assert!(graph.theater(theater).unwrap().admins.contains(&admin));
    }
}
