//! Human drivers typing accelerations at a prompt.

use std::cell::RefCell;
use std::io::{self, BufRead, Write};
use std::rc::Rc;

use racetrack_core::{Direction, MoveStrategy};

const KEYPAD_HELP: &str = "\
  7 8 9   UP_LEFT   UP   UP_RIGHT
  4 5 6   LEFT      NONE RIGHT
  1 2 3   DOWN_LEFT DOWN DOWN_RIGHT
  q       quit";

/// One line-oriented terminal shared by every human driver in a race.
pub struct Console<R, W> {
    input: R,
    output: W,
}

pub type SharedConsole<R, W> = Rc<RefCell<Console<R, W>>>;

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn shared(self) -> SharedConsole<R, W> {
        Rc::new(RefCell::new(self))
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UserInput {
    Move(Direction),
    Quit,
    Help,
}

/// Keypad digit, direction name in any case, `q`/`quit` or `h`/`help`.
pub fn parse_user_input(line: &str) -> Option<UserInput> {
    let token = line.trim();
    let mut chars = token.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if let Some(dir) = Direction::from_keypad(c) {
            return Some(UserInput::Move(dir));
        }
    }
    match token.to_ascii_lowercase().as_str() {
        "q" | "quit" => return Some(UserInput::Quit),
        "h" | "help" | "?" => return Some(UserInput::Help),
        _ => {}
    }
    token
        .to_ascii_uppercase()
        .parse::<Direction>()
        .ok()
        .map(UserInput::Move)
}

pub struct UserMoveStrategy<R, W> {
    car: char,
    console: SharedConsole<R, W>,
}

impl<R: BufRead, W: Write> UserMoveStrategy<R, W> {
    pub fn new(car: char, console: SharedConsole<R, W>) -> Self {
        Self { car, console }
    }

    fn ask(&mut self) -> io::Result<Option<Direction>> {
        let mut console = self.console.borrow_mut();
        loop {
            write!(console.output, "car {} acceleration [1-9, h, q]: ", self.car)?;
            console.output.flush()?;
            let Some(line) = console.read_line()? else {
                return Ok(None);
            };
            match parse_user_input(&line) {
                Some(UserInput::Move(dir)) => return Ok(Some(dir)),
                Some(UserInput::Quit) => return Ok(None),
                Some(UserInput::Help) => writeln!(console.output, "{KEYPAD_HELP}")?,
                None => writeln!(console.output, "unknown input '{}'", line.trim())?,
            }
        }
    }
}

impl<R: BufRead, W: Write> MoveStrategy for UserMoveStrategy<R, W> {
    fn name(&self) -> &'static str {
        "user"
    }

    fn next_move(&mut self) -> Option<Direction> {
        match self.ask() {
            Ok(dir) => dir,
            Err(err) => {
                tracing::warn!(car = %self.car, "reading user input failed: {err}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn console(input: &str) -> SharedConsole<Cursor<Vec<u8>>, Vec<u8>> {
        Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new()).shared()
    }

    #[test]
    fn parses_keypad_names_and_commands() {
        assert_eq!(parse_user_input("8\n"), Some(UserInput::Move(Direction::Up)));
        assert_eq!(parse_user_input(" 5 "), Some(UserInput::Move(Direction::None)));
        assert_eq!(
            parse_user_input("down_right"),
            Some(UserInput::Move(Direction::DownRight))
        );
        assert_eq!(parse_user_input("Q"), Some(UserInput::Quit));
        assert_eq!(parse_user_input("help"), Some(UserInput::Help));
        assert_eq!(parse_user_input("0"), None);
        assert_eq!(parse_user_input("forward"), None);
    }

    #[test]
    fn reprompts_until_a_valid_move() {
        let shared = console("x\nh\n6\n");
        let mut strategy = UserMoveStrategy::new('a', Rc::clone(&shared));
        assert_eq!(strategy.next_move(), Some(Direction::Right));

        let output = String::from_utf8(shared.borrow().output().clone()).unwrap();
        assert_eq!(output.matches("car a acceleration").count(), 3);
        assert!(output.contains("unknown input 'x'"));
        assert!(output.contains("UP_LEFT"));
    }

    #[test]
    fn quit_and_end_of_input_stop_the_driver() {
        let shared = console("q\n");
        let mut strategy = UserMoveStrategy::new('a', Rc::clone(&shared));
        assert_eq!(strategy.next_move(), None);
        assert_eq!(strategy.next_move(), None);
    }

    #[test]
    fn drivers_share_one_input_stream() {
        let shared = console("4\n6\n");
        let mut a = UserMoveStrategy::new('a', Rc::clone(&shared));
        let mut b = UserMoveStrategy::new('b', Rc::clone(&shared));
        assert_eq!(a.next_move(), Some(Direction::Left));
        assert_eq!(b.next_move(), Some(Direction::Right));
        assert!(!a.is_stationary());
    }
}
