pub const OTP_LENGTH: usize = 6;

/// One-time-password entry split over one box per digit
///
/// Every editing method returns the index of the box that should get focus.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OtpInput {
    digits: Vec<Option<char>>,
}

impl Default for OtpInput {
    fn default() -> OtpInput {
        OtpInput::new(OTP_LENGTH)
    }
}

impl OtpInput {
    pub fn new(len: usize) -> OtpInput {
        assert!(len > 0, "an otp needs at least one digit");
        OtpInput {
            digits: vec![None; len],
        }
    }

    pub fn len(&self) -> usize {
        self.digits.len()
    }

    pub fn digits(&self) -> &[Option<char>] {
        &self.digits
    }

    pub fn clear(&mut self) {
        self.digits.iter_mut().for_each(|d| *d = None);
    }

    /// Handles the new value of box `index`
    ///
    /// Multi-character values come from pasting and are spread over the boxes.
    pub fn input(&mut self, index: usize, value: &str) -> usize {
        let index = index.min(self.len() - 1);
        let mut chars = value.chars().filter(|c| !c.is_whitespace());
        match (chars.next(), chars.next()) {
            (None, _) => {
                self.digits[index] = None;
                index
            }
            (Some(c), None) if c.is_ascii_digit() => {
                self.digits[index] = Some(c);
                (index + 1).min(self.len() - 1)
            }
            (Some(_), None) => index,
            (Some(_), Some(_)) => self.paste(index, value),
        }
    }

    /// Spreads the digits of `text` over the boxes starting at `index`
    pub fn paste(&mut self, index: usize, text: &str) -> usize {
        let index = index.min(self.len() - 1);
        let mut filled = 0;
        for (slot, c) in self.digits[index..]
            .iter_mut()
            .zip(text.chars().filter(|c| c.is_ascii_digit()))
        {
            *slot = Some(c);
            filled += 1;
        }
        (index + filled).min(self.len() - 1)
    }

    pub fn backspace(&mut self, index: usize) -> usize {
        let index = index.min(self.len() - 1);
        if self.digits[index].is_some() {
            self.digits[index] = None;
            return index;
        }
        match index {
            0 => 0,
            i => {
                self.digits[i - 1] = None;
                i - 1
            }
        }
    }

    pub fn is_complete(&self) -> bool {
        self.digits.iter().all(Option::is_some)
    }

    /// The full code, once every box is filled
    pub fn code(&self) -> Option<String> {
        self.digits.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_moves_forward() {
        let mut otp = OtpInput::default();
        let mut focus = 0;
        for c in "123456".chars() {
            focus = otp.input(focus, &c.to_string());
        }
        assert_eq!(focus, 5);
        assert_eq!(otp.code().as_deref(), Some("123456"));
    }

    #[test]
    fn letters_are_refused() {
        let mut otp = OtpInput::default();
        assert_eq!(otp.input(2, "a"), 2);
        assert_eq!(otp.digits()[2], None);
        assert_eq!(otp.code(), None);
    }

    #[test]
    fn paste_splits_digits() {
        let mut otp = OtpInput::default();
        assert_eq!(otp.input(0, "12 34-56"), 5);
        assert_eq!(otp.code().as_deref(), Some("123456"));

        let mut otp = OtpInput::default();
        assert_eq!(otp.paste(1, "987"), 4);
        assert_eq!(
            otp.digits(),
            &[None, Some('9'), Some('8'), Some('7'), None, None]
        );
        assert_eq!(otp.paste(0, "abc"), 0);
    }

    #[test]
    fn oversized_paste_is_truncated() {
        let mut otp = OtpInput::new(4);
        assert_eq!(otp.paste(2, "123456"), 3);
        assert_eq!(otp.digits(), &[None, None, Some('1'), Some('2')]);
    }

    #[test]
    fn backspace_moves_back_on_empty_box() {
        let mut otp = OtpInput::default();
        otp.paste(0, "12");
        assert_eq!(otp.backspace(2), 1);
        assert_eq!(otp.digits()[1], None);
        assert_eq!(otp.backspace(0), 0);
        assert_eq!(otp.digits()[0], None);
        assert_eq!(otp.backspace(0), 0);
    }
}
