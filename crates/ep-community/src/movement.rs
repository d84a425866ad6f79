//! The hourly movement decision tree.
//!
//! Each hour every person runs [`Person::update`], which on the first tick of
//! a day advances the infection and then picks at most one move.  Rules are
//! checked in a fixed order; the first that applies wins:
//!
//! 1. the dead are carried to a morgue and never leave;
//! 2. the quarantined stay home and, once recovered, get retested;
//! 3. the symptomatic get tested once a day unless they ignore it;
//! 4. at home: groceries, then hardware, then travel, work or school;
//! 5. in a store: chain to the other store if due, else go home;
//! 6. at work: leave at the end of the shift, sometimes on a trip;
//! 7. at school: go home at the end of the school day;
//! 8. away: come home with a chance that grows with each day away.

use ep_core::{HourContext, PlaceId, PlaceKind};
use ep_disease::DayOutcome;

use crate::person::Errand;
use crate::{CommunityResult, CommunityView, Person};

impl Person {
    /// Advance this person by one hour.
    pub fn update(&mut self, view: &CommunityView<'_>, ctx: HourContext) -> CommunityResult<()> {
        if ctx.is_new_day && self.alive {
            self.days_since_food += 1;
            self.days_since_hardware += 1;
            if self.infection.advance_day(self.rng.inner()) == DayOutcome::Died {
                self.kill();
            }
        }
        self.check_next_move(view, ctx)
    }

    fn check_next_move(&mut self, view: &CommunityView<'_>, ctx: HourContext) -> CommunityResult<()> {
        if !self.alive {
            if self.whereabouts.kind != PlaceKind::Morgue {
                view.transfer_to_morgue(self)?;
                self.arrived_at = ctx.tick;
            }
            return Ok(());
        }

        let routine = view.routine();

        if self.quarantined {
            if self.whereabouts != self.home {
                self.go(view, ctx, |v, p| v.transfer_to_home(p))?;
            }
            if self.infection.has_recovered() && self.may_test(ctx, routine.shop_open_hour) {
                self.last_test_day = Some(ctx.day);
                view.test_station(self)?;
            }
            return Ok(());
        }

        if self.infection.has_symptoms() && self.may_test(ctx, routine.shop_open_hour) {
            self.last_test_day = Some(ctx.day);
            let ignores = self.profile.acceptance < routine.symptom_ignore_below
                && self.rng.gen_bool(routine.symptom_ignore_chance);
            if !ignores && view.test_station(self)? {
                self.arrived_at = ctx.tick;
                return Ok(());
            }
        }

        match self.whereabouts.kind {
            PlaceKind::Home => self.from_home(view, ctx),
            PlaceKind::Supply | PlaceKind::HardwareStore => self.from_store(view, ctx),
            PlaceKind::Workplace => {
                if ctx.hour >= routine.work_end_hour {
                    if self.departs_on_trip(view) {
                        self.leave_on_trip(view, ctx)?;
                    } else {
                        self.go(view, ctx, |v, p| v.transfer_to_home(p))?;
                    }
                }
                Ok(())
            }
            PlaceKind::School => {
                if ctx.hour >= routine.school_end_hour {
                    self.go(view, ctx, |v, p| v.transfer_to_home(p))?;
                }
                Ok(())
            }
            PlaceKind::Travel => self.while_away(view, ctx),
            PlaceKind::Morgue => Ok(()),
        }
    }

    /// Testing is possible once the test station opens, at most once a day.
    fn may_test(&self, ctx: HourContext, open_hour: u32) -> bool {
        ctx.hour >= open_hour && self.last_test_day != Some(ctx.day)
    }

    fn go(
        &mut self,
        view: &CommunityView<'_>,
        ctx:  HourContext,
        f:    impl FnOnce(&CommunityView<'_>, &mut Person) -> CommunityResult<PlaceId>,
    ) -> CommunityResult<()> {
        f(view, self)?;
        self.arrived_at = ctx.tick;
        Ok(())
    }

    // ── At home ───────────────────────────────────────────────────────────

    fn from_home(&mut self, view: &CommunityView<'_>, ctx: HourContext) -> CommunityResult<()> {
        let routine = view.routine();
        let measures = view.measures();

        if self.errand.is_some_and(|e| e.day != ctx.day) {
            self.errand = None;
        }

        let shops_open = routine.shops_open_at(ctx.hour);
        if self.food_due() && shops_open {
            return self.run_errand(view, ctx, PlaceKind::Supply);
        }
        if self.hardware_due() && shops_open && !measures.shops_closed && !measures.lockdown {
            return self.run_errand(view, ctx, PlaceKind::HardwareStore);
        }

        if self.shopping_day == Some(ctx.day) || ctx.hour != routine.work_start_hour {
            return Ok(());
        }

        if self.departs_on_trip(view) {
            return self.leave_on_trip(view, ctx);
        }
        if ctx.is_workday && self.workplace.is_some() && self.may_work(view) {
            return self.go(view, ctx, |v, p| v.transfer_to_work(p));
        }
        if ctx.is_workday && self.school.is_some() && !measures.work_from_home && !measures.lockdown {
            return self.go(view, ctx, |v, p| v.transfer_to_school(p));
        }
        Ok(())
    }

    /// Plan a store visit for a random hour before closing, then go once that
    /// hour has come.
    fn run_errand(
        &mut self,
        view: &CommunityView<'_>,
        ctx:  HourContext,
        kind: PlaceKind,
    ) -> CommunityResult<()> {
        let errand = match self.errand {
            Some(errand) if errand.kind == kind => errand,
            _ => {
                let close = view.routine().shop_close_hour;
                let errand = Errand { kind, day: ctx.day, hour: self.rng.gen_range(ctx.hour..close) };
                self.errand = Some(errand);
                self.shopping_day = Some(ctx.day);
                errand
            }
        };
        if ctx.hour < errand.hour {
            return Ok(());
        }
        self.errand = None;
        match kind {
            PlaceKind::HardwareStore => self.go(view, ctx, |v, p| v.transfer_to_hardware_store(p)),
            _ => self.go(view, ctx, |v, p| v.transfer_to_supply(p)),
        }
    }

    fn may_work(&self, view: &CommunityView<'_>) -> bool {
        let measures = view.measures();
        let remote = measures.work_from_home && self.job.can_work_from_home;
        let locked_out = measures.lockdown && !self.job.critical_infrastructure;
        !remote && !locked_out
    }

    fn food_due(&self) -> bool {
        self.days_since_food >= self.profile.food_interval_days
    }

    fn hardware_due(&self) -> bool {
        self.days_since_hardware >= self.profile.hardware_interval_days
    }

    // ── In a store ────────────────────────────────────────────────────────

    /// Stay one hour, then chain to the other store if it is also due, else
    /// head home.
    fn from_store(&mut self, view: &CommunityView<'_>, ctx: HourContext) -> CommunityResult<()> {
        if ctx.tick < self.arrived_at.offset(1) {
            return Ok(());
        }
        let routine = view.routine();
        let measures = view.measures();
        let shops_open = routine.shops_open_at(ctx.hour);

        if self.whereabouts.kind == PlaceKind::Supply {
            self.days_since_food = 0;
            if self.hardware_due() && shops_open && !measures.shops_closed && !measures.lockdown {
                return self.go(view, ctx, |v, p| v.transfer_to_hardware_store(p));
            }
        } else {
            self.days_since_hardware = 0;
            if self.food_due() && shops_open {
                return self.go(view, ctx, |v, p| v.transfer_to_supply(p));
            }
        }
        self.go(view, ctx, |v, p| v.transfer_to_home(p))
    }

    // ── Travel ────────────────────────────────────────────────────────────

    fn departs_on_trip(&mut self, view: &CommunityView<'_>) -> bool {
        !view.measures().lockdown && self.rng.gen_bool(self.profile.travel_need)
    }

    fn leave_on_trip(&mut self, view: &CommunityView<'_>, ctx: HourContext) -> CommunityResult<()> {
        self.go(view, ctx, |v, p| v.transfer_to_travel(p))?;
        self.traveling = true;
        self.travel_days = 0;
        log::trace!("{} left on a trip", self.id);
        Ok(())
    }

    fn while_away(&mut self, view: &CommunityView<'_>, ctx: HourContext) -> CommunityResult<()> {
        if !ctx.is_new_day {
            return Ok(());
        }
        self.travel_days += 1;
        let chance = view.routine().travel_return_chance * f64::from(self.travel_days) / 3.0;
        if self.rng.gen_bool(chance) {
            self.go(view, ctx, |v, p| v.transfer_to_home(p))?;
            self.traveling = false;
            self.travel_days = 0;
            log::trace!("{} returned home", self.id);
        }
        Ok(())
    }
}
