mod tests {
    use lamp_composer::math8::{blend8, ease_in_out_quad, ratio8, scale8};

    #[test]
    fn test_scale8() {
        assert_eq!(scale8(255, 128), 128);
        assert_eq!(scale8(0, 128), 0);
        assert_eq!(scale8(128, 128), 64);
        assert_eq!(scale8(128, 255), 128);
        assert_eq!(scale8(128, 0), 0);
    }

    #[test]
    fn test_blend8() {
        assert_eq!(blend8(255, 128, 128), 191);
        assert_eq!(blend8(0, 128, 255), 128);
        assert_eq!(blend8(255, 0, 128), 127);
        assert_eq!(blend8(255, 128, 0), 255);
    }

    #[test]
    fn test_ratio8() {
        assert_eq!(ratio8(0, 100), 0);
        assert_eq!(ratio8(50, 100), 127);
        assert_eq!(ratio8(100, 100), 255);
        assert_eq!(ratio8(120, 100), 255);
        assert_eq!(ratio8(0, 0), 255);
    }

    #[test]
    fn test_ease_in_out_quad() {
        assert_eq!(ease_in_out_quad(0), 0);
        assert_eq!(ease_in_out_quad(255), 255);

        let mut previous = 0;
        for i in 0..=255u8 {
            let eased = ease_in_out_quad(i);
            assert!(eased >= previous);
            previous = eased;
        }
    }
}
