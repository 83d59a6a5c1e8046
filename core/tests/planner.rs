#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use stayplan_core::environment::Clock;
    use stayplan_core::planner::{minimum_budget, ItineraryPlanner, ItineraryRequest, Preferences};
    use stayplan_core::repository::{EventRepository, RoomRepository};
    use stayplan_core::types::{Capacity, Event, EventId, Money, Room, RoomId, UserId};
    use stayplan_core::CoreError;
    use chrono::Duration;
    use stayplan_testing::mocks::{
        test_clock, InMemoryEventRepository, InMemoryRoomRepository, ScriptedOracle,
    };

    fn room(price: u64) -> Room {
        Room {
            id: RoomId::new(),
            room_type: format!("Room at {price}"),
            price_per_night: Money::from_cents(price),
            amenities: vec!["WiFi".to_string()],
            is_available: true,
            images: vec![],
        }
    }

    fn open_event(name: &str, price: u64) -> Event {
        let now = test_clock().now();
        Event {
            id: EventId::new(),
            name: name.to_string(),
            description: format!("{name} description"),
            date: now + Duration::days(3),
            location: "Main Hall".to_string(),
            price: Money::from_cents(price),
            capacity: Capacity::new(50).unwrap(),
            booked_by: vec![],
            images: vec![],
            created_at: now,
        }
    }

    fn request(budget: u64, nights: u32) -> ItineraryRequest {
        ItineraryRequest {
            budget: Money::from_cents(budget),
            length_of_stay: nights,
            preferences: Preferences::default(),
        }
    }

    async fn planner_with(
        rooms: Vec<Room>,
        events: Vec<Event>,
        oracle: ScriptedOracle,
    ) -> (ItineraryPlanner, Arc<ScriptedOracle>) {
        let room_repo = Arc::new(InMemoryRoomRepository::new());
        for r in rooms {
            room_repo.insert(r).await.unwrap();
        }
        let event_repo = Arc::new(InMemoryEventRepository::new());
        for e in events {
            event_repo.insert(e).await.unwrap();
        }
        let oracle = Arc::new(oracle);
        let planner = ItineraryPlanner::new(
            room_repo,
            event_repo,
            oracle.clone(),
            Arc::new(test_clock()),
        );
        (planner, oracle)
    }

    fn draft_json(room: &Room, event: &Event, nights: u32) -> String {
        let events: Vec<String> = (1..=nights)
            .map(|day| {
                format!(
                    r#"{{ "day": {day}, "eventName": "{name}", "id": "{id}", "date": "01/0{day}/2026", "cost": {cost} }}"#,
                    name = event.name,
                    id = event.id,
                    cost = event.price.cents()
                )
            })
            .collect();
        format!(
            r#"{{ "success": true, "usedBudget": 240, "budgetAdjusted": true,
                 "room": {{ "id": "{room_id}", "type": "{room_type}", "totalCost": {total} }},
                 "events": [{events}] }}"#,
            room_id = room.id,
            room_type = room.room_type,
            total = room.price_per_night.cents() * u64::from(nights),
            events = events.join(", ")
        )
    }

    #[test]
    fn minimum_budget_worked_example() {
        // Rooms priced {100, 150}, events priced {20, 30}, two nights:
        // 100 * 2 + 20 * 2 = 240.
        let rooms = vec![room(100), room(150)];
        let events = vec![open_event("Jazz Night", 20), open_event("Food Market", 30)];
        assert_eq!(
            minimum_budget(&rooms, &events, 2),
            Some(Money::from_cents(240))
        );
    }

    #[test]
    fn minimum_budget_requires_both_inventories() {
        let rooms = vec![room(100)];
        let events = vec![open_event("Jazz Night", 20)];
        assert_eq!(minimum_budget(&rooms, &[], 2), None);
        assert_eq!(minimum_budget(&[], &events, 2), None);
        assert_eq!(minimum_budget(&[], &[], 2), None);
    }

    #[tokio::test]
    async fn rejects_invalid_arguments_before_any_io() {
        let (planner, oracle) =
            planner_with(vec![room(100)], vec![open_event("Jazz Night", 20)], ScriptedOracle::new(vec![])).await;

        let err = planner.plan(request(0, 2)).await.unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgument(_)));

        let err = planner.plan(request(500, 0)).await.unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgument(_)));

        assert_eq!(oracle.calls(), 0);
    }

    #[tokio::test]
    async fn empty_inventory_fails_without_calling_oracle() {
        let (planner, oracle) = planner_with(vec![], vec![], ScriptedOracle::new(vec![])).await;

        let err = planner.plan(request(500, 2)).await.unwrap_err();
        assert!(matches!(err, CoreError::NoInventoryAvailable));
        assert_eq!(oracle.calls(), 0);

        // One empty side is enough: no feasible combination exists.
        let (planner, oracle) =
            planner_with(vec![room(100)], vec![], ScriptedOracle::new(vec![])).await;
        let err = planner.plan(request(500, 2)).await.unwrap_err();
        assert!(matches!(err, CoreError::NoInventoryAvailable));
        assert_eq!(oracle.calls(), 0);
    }

    #[tokio::test]
    async fn raises_requested_budget_to_minimum() {
        let cheap_room = room(100);
        let cheap_event = open_event("Jazz Night", 20);
        let response = draft_json(&cheap_room, &cheap_event, 2);
        let (planner, _) = planner_with(
            vec![cheap_room, room(150)],
            vec![cheap_event.clone(), open_event("Food Market", 30)],
            ScriptedOracle::new(vec![Ok(response)]),
        )
        .await;

        let plan = planner.plan(request(200, 2)).await.unwrap();
        assert_eq!(plan.used_budget, Money::from_cents(240));
        assert!(plan.budget_adjusted);
        // A raise of 40 is below the notice margin.
        assert!(plan.notice.is_none());
        assert_eq!(plan.events.len(), 2);
        assert_eq!(plan.events[0].id, Some(cheap_event.id));
    }

    #[tokio::test]
    async fn large_budget_raise_carries_notice() {
        let pricey_room = room(5000);
        let pricey_event = open_event("Gala Dinner", 2000);
        let response = draft_json(&pricey_room, &pricey_event, 1);
        let (planner, _) = planner_with(
            vec![pricey_room],
            vec![pricey_event],
            ScriptedOracle::new(vec![Ok(response)]),
        )
        .await;

        // Minimum is 7000; requested 500 is raised by 6500 > margin.
        let plan = planner.plan(request(500, 1)).await.unwrap();
        assert_eq!(plan.used_budget, Money::from_cents(7000));
        assert!(plan.budget_adjusted);
        assert!(plan.notice.is_some());
    }

    #[tokio::test]
    async fn sufficient_budget_is_not_adjusted() {
        let cheap_room = room(100);
        let cheap_event = open_event("Jazz Night", 20);
        let response = draft_json(&cheap_room, &cheap_event, 2);
        let (planner, _) = planner_with(
            vec![cheap_room],
            vec![cheap_event],
            ScriptedOracle::new(vec![Ok(response)]),
        )
        .await;

        let plan = planner.plan(request(1000, 2)).await.unwrap();
        assert_eq!(plan.used_budget, Money::from_cents(1000));
        assert!(!plan.budget_adjusted);
        assert!(plan.notice.is_none());
    }

    #[tokio::test]
    async fn unusable_oracle_text_yields_fallback_plan() {
        let (planner, _) = planner_with(
            vec![room(100)],
            vec![open_event("Jazz Night", 20)],
            ScriptedOracle::new(vec![Ok("I'm sorry, I can't plan that.".to_string())]),
        )
        .await;

        let plan = planner.plan(request(200, 2)).await.unwrap();
        assert_eq!(plan.used_budget, Money::from_cents(240));
        assert!(plan.budget_adjusted);
        assert!(plan.room.is_none());
        assert!(plan.events.is_empty());
        assert!(plan.notice.as_deref().unwrap_or_default().contains("minimum budget"));
    }

    #[tokio::test]
    async fn draft_missing_events_yields_fallback_plan() {
        let missing_events = r#"{
            "success": true, "usedBudget": 240, "budgetAdjusted": true,
            "room": { "id": "r", "type": "Standard", "totalCost": 200 }
        }"#;
        let (planner, _) = planner_with(
            vec![room(100)],
            vec![open_event("Jazz Night", 20)],
            ScriptedOracle::new(vec![Ok(missing_events.to_string())]),
        )
        .await;

        let plan = planner.plan(request(200, 2)).await.unwrap();
        assert!(plan.events.is_empty());
        assert!(plan.room.is_none());
        assert_eq!(plan.used_budget, Money::from_cents(240));
    }

    #[tokio::test]
    async fn unresolvable_event_id_falls_back_to_name_match() {
        let cheap_room = room(100);
        let event = open_event("Jazz Night", 20);
        let response = format!(
            r#"{{ "success": true, "usedBudget": 120, "budgetAdjusted": false,
                 "room": {{ "id": "{room_id}", "type": "Standard", "totalCost": 100 }},
                 "events": [{{ "day": 1, "eventName": "JAZZ NIGHT", "id": "not-a-uuid", "date": "tomorrow", "cost": 20 }}] }}"#,
            room_id = cheap_room.id
        );
        let (planner, _) = planner_with(
            vec![cheap_room],
            vec![event.clone()],
            ScriptedOracle::new(vec![Ok(response)]),
        )
        .await;

        let plan = planner.plan(request(500, 1)).await.unwrap();
        assert_eq!(plan.events.len(), 1);
        // Name match is case-insensitive and re-resolves the full details.
        assert_eq!(plan.events[0].id, Some(event.id));
        assert_eq!(plan.events[0].location.as_deref(), Some("Main Hall"));
    }

    #[tokio::test]
    async fn fully_unresolvable_event_keeps_oracle_fields_with_null_id() {
        let cheap_room = room(100);
        let response = format!(
            r#"{{ "success": true, "usedBudget": 120, "budgetAdjusted": false,
                 "room": {{ "id": "{room_id}", "type": "Standard", "totalCost": 100 }},
                 "events": [{{ "day": 1, "eventName": "Imaginary Fest", "date": "05/01/2026", "cost": 20 }}] }}"#,
            room_id = cheap_room.id
        );
        let (planner, _) = planner_with(
            vec![cheap_room],
            vec![open_event("Jazz Night", 20)],
            ScriptedOracle::new(vec![Ok(response)]),
        )
        .await;

        let plan = planner.plan(request(500, 1)).await.unwrap();
        let planned = &plan.events[0];
        assert_eq!(planned.id, None);
        assert_eq!(planned.name, "Imaginary Fest");
        assert_eq!(planned.date.as_deref(), Some("05/01/2026"));
        assert_eq!(planned.cost, Money::from_cents(20));
        assert!(planned.description.is_none());
    }

    #[tokio::test]
    async fn oracle_transport_failure_is_an_error() {
        use stayplan_core::oracle::OracleError;

        let (planner, _) = planner_with(
            vec![room(100)],
            vec![open_event("Jazz Night", 20)],
            ScriptedOracle::new(vec![Err(OracleError::Unavailable(
                "connection refused".to_string(),
            ))]),
        )
        .await;

        let err = planner.plan(request(500, 2)).await.unwrap_err();
        assert!(matches!(err, CoreError::Oracle(_)));
    }

    #[tokio::test]
    async fn planning_context_filters_closed_and_full_events() {
        let now = test_clock().now();
        let open = open_event("Jazz Night", 20);
        let mut past = open_event("Yesterday Gala", 20);
        past.date = now - Duration::days(1);
        let mut full = open_event("Sold Out Show", 20);
        full.capacity = Capacity::new(1).unwrap();
        full.booked_by = vec![UserId::new("u1")];

        let mut hidden_room = room(80);
        hidden_room.is_available = false;

        let (planner, _) = planner_with(
            vec![room(100), hidden_room],
            vec![open.clone(), past, full],
            ScriptedOracle::new(vec![]),
        )
        .await;

        let context = planner.planning_context().await.unwrap();
        assert_eq!(context.rooms.len(), 1);
        assert_eq!(context.events.len(), 1);
        assert_eq!(context.events[0].id, open.id);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn minimum_budget_matches_definition(
                room_prices in proptest::collection::vec(1u64..10_000, 1..8),
                event_prices in proptest::collection::vec(1u64..10_000, 1..8),
                nights in 1u32..30,
            ) {
                let rooms: Vec<Room> = room_prices.iter().map(|p| room(*p)).collect();
                let events: Vec<Event> =
                    event_prices.iter().map(|p| open_event("Prop Event", *p)).collect();

                let expected = (room_prices.iter().min().unwrap()
                    + event_prices.iter().min().unwrap())
                    * u64::from(nights);
                prop_assert_eq!(
                    minimum_budget(&rooms, &events, nights),
                    Some(Money::from_cents(expected))
                );
            }
        }
    }
}
