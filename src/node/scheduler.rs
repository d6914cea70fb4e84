use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use super::flags::PendingFlag;

/// Slots available in the default scheduler. A node arms three timers
/// (link poll, session retry, sample); the headroom is for platform code.
pub const TIMER_SLOTS: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerMode {
    OneShot,
    Repeating,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerError {
    /// No free timer slot. The caller decides between a degraded
    /// poll-every-iteration strategy and treating startup as fatal.
    Exhausted,
}

impl SchedulerError {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exhausted => "exhausted",
        }
    }
}

/// Handle returned by [`TimerScheduler::arm`]. Carries a generation tag so
/// a stale handle kept across disarm/re-arm cannot cancel an unrelated
/// timer that reused the slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerHandle {
    slot: u8,
    generation: u16,
}

#[derive(Clone, Copy)]
struct TimerSlot {
    flag: &'static PendingFlag,
    deadline_ms: u64,
    period_ms: u32,
    mode: TimerMode,
    generation: u16,
}

struct Table<const N: usize> {
    slots: [Option<TimerSlot>; N],
    next_generation: u16,
}

/// Fixed-capacity software timer table.
///
/// `arm`/`disarm` run in loop context, `tick` in the platform's periodic
/// timer interrupt. Both sides take the same critical-section mutex, so a
/// disarm is synchronous: once it returns, the slot cannot fire.
///
/// A timer's action is, by construction, limited to setting one
/// `&'static` [`PendingFlag`] — `tick` performs no I/O and no unbounded
/// work, which is the whole contract that keeps interrupt context safe.
pub struct TimerScheduler<const N: usize = TIMER_SLOTS> {
    table: Mutex<CriticalSectionRawMutex, RefCell<Table<N>>>,
}

impl<const N: usize> TimerScheduler<N> {
    pub const fn new() -> Self {
        Self {
            table: Mutex::new(RefCell::new(Table {
                slots: [None; N],
                next_generation: 0,
            })),
        }
    }

    /// Arm a timer that sets `flag` every `period_ms` (or once, for
    /// [`TimerMode::OneShot`]), starting one period from `now_ms`.
    pub fn arm(
        &self,
        now_ms: u64,
        period_ms: u32,
        mode: TimerMode,
        flag: &'static PendingFlag,
    ) -> Result<TimerHandle, SchedulerError> {
        self.table.lock(|table| {
            let mut table = table.borrow_mut();
            let free = table
                .slots
                .iter()
                .position(|slot| slot.is_none())
                .ok_or(SchedulerError::Exhausted)?;
            let generation = table.next_generation;
            table.next_generation = table.next_generation.wrapping_add(1);
            table.slots[free] = Some(TimerSlot {
                flag,
                deadline_ms: now_ms + u64::from(period_ms),
                period_ms,
                mode,
                generation,
            });
            Ok(TimerHandle {
                slot: free as u8,
                generation,
            })
        })
    }

    /// Cancel a timer. Takes effect before the next possible fire; a stale
    /// handle (slot already reused) is ignored.
    pub fn disarm(&self, handle: TimerHandle) {
        self.table.lock(|table| {
            let mut table = table.borrow_mut();
            let index = handle.slot as usize;
            if index >= N {
                return;
            }
            if let Some(slot) = table.slots[index] {
                if slot.generation == handle.generation {
                    table.slots[index] = None;
                }
            }
        });
    }

    /// Advance the table to `now_ms`, setting the flag of every due timer.
    /// Called from the platform's periodic timer interrupt (or the test
    /// harness). Missed periods collapse into a single fire; the flags
    /// coalesce anyway.
    pub fn tick(&self, now_ms: u64) {
        self.table.lock(|table| {
            let mut table = table.borrow_mut();
            for entry in table.slots.iter_mut() {
                let Some(slot) = entry else { continue };
                if slot.deadline_ms > now_ms {
                    continue;
                }
                slot.flag.set();
                match slot.mode {
                    TimerMode::OneShot => *entry = None,
                    TimerMode::Repeating => {
                        let mut next = slot.deadline_ms + u64::from(slot.period_ms);
                        if next <= now_ms {
                            next = now_ms + u64::from(slot.period_ms);
                        }
                        slot.deadline_ms = next;
                    }
                }
            }
        });
    }

    /// Number of armed slots, for diagnostics.
    pub fn armed(&self) -> usize {
        self.table
            .lock(|table| table.borrow().slots.iter().filter(|slot| slot.is_some()).count())
    }
}

impl<const N: usize> Default for TimerScheduler<N> {
    fn default() -> Self {
        Self::new()
    }
}
