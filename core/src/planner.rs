//! Budget-constrained itinerary planner.
//!
//! Given a budget, a stay length and a preference set, produces one room
//! selection and one event per day. The requested budget is reconciled
//! against the minimum feasible budget computed from live inventory; the
//! concrete allocation is delegated to the planning oracle, whose output is
//! validated, re-resolved against the store, and replaced by a fallback
//! plan when unusable. The fallback is an expected outcome, not an edge
//! case.

use crate::environment::Clock;
use crate::error::CoreError;
use crate::oracle::{DraftEvent, DraftRoom, PlanDraft, PlanningOracle};
use crate::repository::{EventRepository, RoomRepository};
use crate::types::{Event, EventId, Money, Room, RoomId};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Budget raise above which the plan carries a user-facing notice.
///
/// A raise at or below this margin is applied silently; beyond it the plan
/// explains that the minimum feasible budget was used.
pub const BUDGET_NOTICE_MARGIN: Money = Money::from_cents(1000);

// ============================================================================
// Requests
// ============================================================================

/// User preference set for itinerary generation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Preferred room type, if any
    #[serde(default)]
    pub room_type: Option<String>,
    /// Preferred amenities
    #[serde(default)]
    pub amenities: Vec<String>,
    /// Event interests
    #[serde(default)]
    pub event_interests: Vec<String>,
}

/// Input to [`ItineraryPlanner::plan`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItineraryRequest {
    /// Requested budget for the whole stay
    pub budget: Money,
    /// Stay length in nights; one event is planned per night
    pub length_of_stay: u32,
    /// Preference set
    pub preferences: Preferences,
}

// ============================================================================
// Results
// ============================================================================

/// Room selection inside a finished plan, re-resolved against the store
/// where possible.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlannedRoom {
    /// Store id; `None` when the oracle's reference could not be resolved
    pub id: Option<RoomId>,
    /// Room type
    pub room_type: Option<String>,
    /// Nightly price, when resolved
    pub price_per_night: Option<Money>,
    /// Amenities, when resolved
    pub amenities: Vec<String>,
    /// Image URLs, when resolved
    pub images: Vec<String>,
    /// Total room cost over the stay, as allocated by the oracle
    pub total_cost: Money,
}

/// Day-indexed event selection inside a finished plan.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlannedEvent {
    /// 1-based day of the stay
    pub day: u32,
    /// Event name
    pub name: String,
    /// Store id; `None` when resolution failed by id and by name
    pub id: Option<EventId>,
    /// Event date (MM/DD/YYYY when resolved; the oracle's text otherwise)
    pub date: Option<String>,
    /// Allocated cost for the day
    pub cost: Money,
    /// Description, when resolved
    pub description: Option<String>,
    /// Location, when resolved
    pub location: Option<String>,
    /// Image URLs, when resolved
    pub images: Vec<String>,
}

/// A finished itinerary plan. Derived per request, never persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItineraryPlan {
    /// The budget the plan was generated against (requested budget, raised
    /// to the minimum feasible value when necessary)
    pub used_budget: Money,
    /// True iff `used_budget` exceeds the requested budget
    pub budget_adjusted: bool,
    /// Selected room; `None` in fallback plans
    pub room: Option<PlannedRoom>,
    /// One selection per day; empty in fallback plans
    pub events: Vec<PlannedEvent>,
    /// Advisory message for significant budget raises or fallback plans
    pub notice: Option<String>,
}

/// Candidate inventory the planner works from; also served read-only to
/// clients preparing a planning request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlanningContext {
    /// Rooms currently offered
    pub rooms: Vec<Room>,
    /// Events open for booking
    pub events: Vec<Event>,
}

// ============================================================================
// Minimum budget
// ============================================================================

/// Minimum feasible budget: the cheapest available room for the whole stay
/// plus the cheapest open event on each day.
///
/// Returns `None` when either inventory is empty (no feasible combination
/// exists at any budget) or when the totals overflow.
#[must_use]
pub fn minimum_budget(rooms: &[Room], events: &[Event], nights: u32) -> Option<Money> {
    let min_room = rooms.iter().map(|r| r.price_per_night).min()?;
    let min_event = events.iter().map(|e| e.price).min()?;
    let room_total = min_room.checked_multiply(nights)?;
    let event_total = min_event.checked_multiply(nights)?;
    room_total.checked_add(event_total)
}

// ============================================================================
// Planner
// ============================================================================

/// Itinerary planning service.
#[derive(Clone)]
pub struct ItineraryPlanner {
    rooms: Arc<dyn RoomRepository>,
    events: Arc<dyn EventRepository>,
    oracle: Arc<dyn PlanningOracle>,
    clock: Arc<dyn Clock>,
}

impl ItineraryPlanner {
    /// Creates a new `ItineraryPlanner`.
    #[must_use]
    pub fn new(
        rooms: Arc<dyn RoomRepository>,
        events: Arc<dyn EventRepository>,
        oracle: Arc<dyn PlanningOracle>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            rooms,
            events,
            oracle,
            clock,
        }
    }

    /// Load the candidate inventory: available rooms and open events.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Repository`] on store failure.
    pub async fn planning_context(&self) -> Result<PlanningContext, CoreError> {
        let now = self.clock.now();
        let rooms = self.rooms.list_available().await?;
        let events = self
            .events
            .list()
            .await?
            .into_iter()
            .filter(|event| event.is_open(now))
            .collect();
        Ok(PlanningContext { rooms, events })
    }

    /// Generate an itinerary plan.
    ///
    /// # Errors
    ///
    /// - [`CoreError::InvalidArgument`] for a zero budget or zero stay
    ///   length (checked before any store or oracle access)
    /// - [`CoreError::NoInventoryAvailable`] when rooms or open events are
    ///   missing entirely (the oracle is never called in this case)
    /// - [`CoreError::Oracle`] when the oracle cannot be reached
    /// - [`CoreError::Repository`] on store failure
    ///
    /// Unusable oracle *output* is not an error: it yields a fallback plan
    /// with an empty allocation, `used_budget` set to the minimum feasible
    /// budget, and an explanatory notice.
    pub async fn plan(&self, request: ItineraryRequest) -> Result<ItineraryPlan, CoreError> {
        if request.budget.is_zero() {
            return Err(CoreError::InvalidArgument(
                "budget must be a positive amount".to_string(),
            ));
        }
        if request.length_of_stay == 0 {
            return Err(CoreError::InvalidArgument(
                "length of stay must be at least one night".to_string(),
            ));
        }

        let context = self.planning_context().await?;
        let nights = request.length_of_stay;

        let Some(min_budget) = minimum_budget(&context.rooms, &context.events, nights) else {
            if context.rooms.is_empty() || context.events.is_empty() {
                return Err(CoreError::NoInventoryAvailable);
            }
            return Err(CoreError::InvalidArgument(
                "stay length overflows the budget arithmetic".to_string(),
            ));
        };

        let used_budget = request.budget.max(min_budget);

        let prompt = render_prompt(&request, &context);
        let raw = self.oracle.propose(prompt).await?;

        let Some(draft) = PlanDraft::from_text(&raw) else {
            tracing::warn!(
                response_len = raw.len(),
                min_budget = %min_budget,
                "Unusable oracle response, generating fallback plan"
            );
            return Ok(Self::fallback_plan(request.budget, min_budget));
        };

        let room = self.resolve_room(&draft.room).await?;
        let events = self.resolve_events(&draft.events, &context.events).await?;

        let budget_adjusted = used_budget > request.budget;
        let notice = used_budget
            .checked_sub(request.budget)
            .filter(|raise| *raise > BUDGET_NOTICE_MARGIN)
            .map(|_| {
                format!(
                    "The lowest available budget is {used_budget}. \
                     A plan has been generated using this budget."
                )
            });

        Ok(ItineraryPlan {
            used_budget,
            budget_adjusted,
            room,
            events,
            notice,
        })
    }

    /// Fallback plan used when the oracle response cannot be trusted.
    fn fallback_plan(requested: Money, min_budget: Money) -> ItineraryPlan {
        ItineraryPlan {
            used_budget: min_budget,
            budget_adjusted: requested < min_budget,
            room: None,
            events: vec![],
            notice: Some(format!(
                "Generated with minimum budget of {min_budget} due to an unusable planner response"
            )),
        }
    }

    /// Re-resolve the draft room against the store.
    ///
    /// A draft without a room id yields no room selection. A draft id that
    /// fails to resolve keeps the oracle-provided fields with a null id.
    async fn resolve_room(&self, draft: &DraftRoom) -> Result<Option<PlannedRoom>, CoreError> {
        let Some(raw_id) = draft.id.as_deref() else {
            return Ok(None);
        };

        let total_cost = Money::from_f64_lossy(draft.total_cost);
        let stored = match Uuid::parse_str(raw_id) {
            Ok(uuid) => self.rooms.find(RoomId::from_uuid(uuid)).await?,
            Err(_) => None,
        };

        Ok(Some(match stored {
            Some(room) => PlannedRoom {
                id: Some(room.id),
                room_type: Some(room.room_type),
                price_per_night: Some(room.price_per_night),
                amenities: room.amenities,
                images: room.images,
                total_cost,
            },
            None => PlannedRoom {
                id: None,
                room_type: draft.room_type.clone(),
                price_per_night: None,
                amenities: vec![],
                images: vec![],
                total_cost,
            },
        }))
    }

    /// Re-resolve draft events against the store, concurrently.
    ///
    /// Resolution order per event: by id, then by case-insensitive name
    /// among the candidate list, then retain the oracle-provided fields
    /// with a null id. Each resolution is independent and side-effect-free.
    async fn resolve_events(
        &self,
        drafts: &[DraftEvent],
        candidates: &[Event],
    ) -> Result<Vec<PlannedEvent>, CoreError> {
        let lookups = drafts.iter().map(|draft| async move {
            let by_id = match draft.id.as_deref().map(Uuid::parse_str) {
                Some(Ok(uuid)) => self.events.find(EventId::from_uuid(uuid)).await?,
                _ => None,
            };

            let resolved = by_id.or_else(|| {
                candidates
                    .iter()
                    .find(|candidate| candidate.name.eq_ignore_ascii_case(&draft.event_name))
                    .cloned()
            });

            Ok::<PlannedEvent, CoreError>(match resolved {
                Some(event) => PlannedEvent {
                    day: draft.day,
                    name: draft.event_name.clone(),
                    id: Some(event.id),
                    date: Some(event.date.format("%m/%d/%Y").to_string()),
                    cost: Money::from_f64_lossy(draft.cost),
                    description: Some(event.description),
                    location: Some(event.location),
                    images: event.images,
                },
                None => PlannedEvent {
                    day: draft.day,
                    name: draft.event_name.clone(),
                    id: None,
                    date: draft.date.clone(),
                    cost: Money::from_f64_lossy(draft.cost),
                    description: None,
                    location: None,
                    images: vec![],
                },
            })
        });

        join_all(lookups).await.into_iter().collect()
    }
}

/// Render the planning prompt from the request and candidate inventory.
fn render_prompt(request: &ItineraryRequest, context: &PlanningContext) -> String {
    let nights = request.length_of_stay;
    let preferences = &request.preferences;

    let room_lines = if context.rooms.is_empty() {
        "No rooms available".to_string()
    } else {
        context
            .rooms
            .iter()
            .map(|room| {
                format!(
                    "- {} (ID: {}), {}/night, Amenities: {}",
                    room.room_type,
                    room.id,
                    room.price_per_night,
                    room.amenities.join(", ")
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    let event_lines = if context.events.is_empty() {
        "No events available".to_string()
    } else {
        context
            .events
            .iter()
            .map(|event| {
                format!(
                    "- {} (ID: {}), Date: {}, Cost: {}",
                    event.name,
                    event.id,
                    event.date.format("%m/%d/%Y"),
                    event.price
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "You are an assistant for a hotel booking and event planning system. A user has provided:\n\
         - Requested budget: {budget} for {nights} night(s). All amounts are integers in minor currency units.\n\
         - Preferred room type: {room_type}.\n\
         - Preferred amenities: {amenities}.\n\
         - Event interests: {interests}.\n\
         \n\
         Available rooms:\n{room_lines}\n\
         \n\
         Available events:\n{event_lines}\n\
         \n\
         Task:\n\
         1. Calculate the minimum budget as the cost of the cheapest room for {nights} night(s) plus the cheapest event for each of {nights} day(s).\n\
         2. If the requested budget is less than the minimum budget, use the minimum budget to generate the plan.\n\
         3. Select the best room within the used budget and preferences.\n\
         4. Create a daily event plan for {nights} day(s), one event per day aligned with the user's interests, within the remaining used budget. Avoid duplicate events unless necessary.\n\
         5. Respond with strict JSON only (no markdown, no extra text):\n\
         {{\n\
           \"success\": true,\n\
           \"usedBudget\": number,\n\
           \"budgetAdjusted\": boolean,\n\
           \"room\": {{ \"id\": string, \"type\": string, \"totalCost\": number }},\n\
           \"events\": [{{ \"day\": number, \"eventName\": string, \"id\": string, \"date\": string (MM/DD/YYYY), \"cost\": number }}]\n\
         }}\n\
         Use the provided room and event IDs. Return empty room/events if no suitable options exist.",
        budget = request.budget,
        room_type = preferences.room_type.as_deref().unwrap_or("Any"),
        amenities = if preferences.amenities.is_empty() {
            "None specified".to_string()
        } else {
            preferences.amenities.join(", ")
        },
        interests = if preferences.event_interests.is_empty() {
            "Any".to_string()
        } else {
            preferences.event_interests.join(", ")
        },
    )
}

