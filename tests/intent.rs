mod tests {
    use embassy_time::{Duration, Instant};
    use lamp_composer::color::{Color, rgbw};
    use lamp_composer::intent::{NameTooLong, TrySendError};
    use lamp_composer::{
        AnimationState, ExpressionConfig, ExpressionId, ExpressionManager, FrameBuffer,
        FrameScheduler, IntentChannel, LampIntent, OutputDriver,
    };
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    const RED: Color = rgbw(255, 0, 0, 0);

    type Manager = ExpressionManager<4, 2, SmallRng>;

    fn manager() -> Manager {
        let mut manager = ExpressionManager::new(FrameBuffer::new(4));
        manager
            .register_config(
                ExpressionId::Pulse,
                &ExpressionConfig::with_colors(&[RED]),
                SmallRng::seed_from_u64(1),
            )
            .unwrap();
        manager
    }

    #[derive(Default)]
    struct Recorder {
        writes: usize,
        last: Vec<Color>,
    }

    impl OutputDriver for &mut Recorder {
        fn write(&mut self, colors: &[Color]) {
            self.writes += 1;
            self.last = colors.to_vec();
        }
    }

    #[test]
    fn test_intent_names() {
        assert!(LampIntent::trigger("glitchy").is_ok());
        assert_eq!(LampIntent::stop(&"x".repeat(40)), Err(NameTooLong));
    }

    #[test]
    fn test_channel_is_bounded_fifo() {
        let channel: IntentChannel<2> = IntentChannel::new();
        let sender = channel.sender();

        sender.try_send(LampIntent::HomeMode(true)).unwrap();
        sender.try_send(LampIntent::trigger("pulse").unwrap()).unwrap();
        assert_eq!(
            sender.try_send(LampIntent::HomeMode(false)),
            Err(TrySendError(LampIntent::HomeMode(false)))
        );

        let receiver = channel.receiver();
        assert_eq!(receiver.try_receive(), Some(LampIntent::HomeMode(true)));
        assert_eq!(receiver.try_receive(), Some(LampIntent::trigger("pulse").unwrap()));
        assert_eq!(receiver.try_receive(), None);
    }

    #[test]
    fn test_apply_pending() {
        let channel: IntentChannel<4> = IntentChannel::new();
        let mut manager = manager();

        channel.try_send(LampIntent::trigger("pulse").unwrap()).unwrap();
        channel.try_send(LampIntent::trigger("missing").unwrap()).unwrap();
        channel.try_send(LampIntent::HomeMode(true)).unwrap();

        assert_eq!(channel.receiver().apply_pending(&mut manager), 3);
        assert_eq!(manager.state_of("pulse"), Some(AnimationState::PlayingOnce));
        assert!(manager.home_mode());

        channel.try_send(LampIntent::stop("pulse").unwrap()).unwrap();
        assert_eq!(channel.receiver().apply_pending(&mut manager), 1);
        assert_eq!(manager.state_of("pulse"), Some(AnimationState::Stopped));
    }

    #[test]
    fn test_scheduler_paces_frames() {
        let mut recorder = Recorder::default();
        {
            let mut scheduler: FrameScheduler<'_, _, 4, 2, 1, SmallRng> =
                FrameScheduler::with_frame_duration(manager(), &mut recorder, Duration::from_millis(10));

            let result = scheduler.tick(Instant::from_millis(0), &mut []);
            assert_eq!(result.next_deadline, Instant::from_millis(10));
            assert_eq!(result.sleep_duration, Duration::from_millis(10));

            let result = scheduler.tick(Instant::from_millis(14), &mut []);
            assert_eq!(result.next_deadline, Instant::from_millis(20));
            assert_eq!(result.sleep_duration, Duration::from_millis(6));

            // Far behind schedule: skip ahead instead of bursting
            let result = scheduler.tick(Instant::from_millis(500), &mut []);
            assert_eq!(result.next_deadline, Instant::from_millis(510));
        }

        assert_eq!(recorder.writes, 3);
        assert_eq!(recorder.last, [rgbw(0, 0, 0, 0); 4]);
    }

    #[test]
    fn test_scheduler_drains_intents() {
        let channel: IntentChannel<4> = IntentChannel::new();
        let mut recorder = Recorder::default();
        let mut scheduler =
            FrameScheduler::new(manager(), &mut recorder).with_intents(channel.receiver());

        channel.try_send(LampIntent::trigger("pulse").unwrap()).unwrap();
        channel.try_send(LampIntent::HomeMode(true)).unwrap();
        scheduler.tick(Instant::from_millis(0), &mut []);

        assert!(scheduler.manager().home_mode());
        assert_eq!(
            scheduler.manager().state_of("pulse"),
            Some(AnimationState::PlayingOnce)
        );
        assert_eq!(channel.try_receive(), None);
    }
}
